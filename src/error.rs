use sekolah_api::client::editor::EditorError;
use sekolah_api::client::error::{ErrorClass, RequestError};
use sekolah_lib::{context_trait, source_from};

type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub struct Error {
    context: Option<String>,
    src: Option<BoxDynError>,
}

pub type Result<T = ()> = std::result::Result<T, Error>;

impl Error {
    pub fn new() -> Error {
        Error {
            context: None,
            src: None,
        }
    }

    pub fn context<C>(mut self, cxt: C) -> Error
    where
        C: Into<String>
    {
        self.context = Some(cxt.into());
        self
    }

    pub fn source<S>(mut self, src: S) -> Error
    where
        S: Into<BoxDynError>
    {
        self.src = Some(src.into());
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.context, &self.src) {
            (Some(cxt), Some(src)) => write!(f, "{}: {}", cxt, src),
            (Some(cxt), None) => write!(f, "{}", cxt),
            (None, Some(src)) => write!(f, "{}", src),
            (None, None) => write!(f, "UNKNOWN ERROR"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.src.as_ref().map(|v| & **v as _)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new().context(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new().context(msg)
    }
}

context_trait!(Error);

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<BoxDynError>
{
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        match self {
            Ok(v) => Ok(v),
            Err(err) => Err(Error::new()
                .context(cxt)
                .source(err))
        }
    }
}

impl<T> Context<T, ()> for std::option::Option<T> {
    fn context<C>(self, cxt: C) -> std::result::Result<T, Error>
    where
        C: Into<String>
    {
        match self {
            Some(v) => Ok(v),
            None => Err(Error::new().context(cxt))
        }
    }
}

source_from!(
    Error,
    std::io::Error,
    url::ParseError,
    serde_json::Error,
    serde_yaml::Error,
);

// the notifier has already shown the user why a request failed, the error
// only carries what is left to say
impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        match err.class() {
            ErrorClass::Unreachable => Error::new().context("server unreachable"),
            ErrorClass::Auth => Error::new().context("not logged in, run login first"),
            ErrorClass::Cancelled => Error::new().context("request cancelled"),
            ErrorClass::Rejected => Error::new().context("request rejected").source(err),
            ErrorClass::Unexpected => Error::new().context("request failed").source(err),
        }
    }
}

impl From<EditorError> for Error {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Request(err) => Self::from(err),
            err => Error::new().source(err),
        }
    }
}
