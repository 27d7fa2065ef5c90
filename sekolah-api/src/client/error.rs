use reqwest::StatusCode;

use crate::ApiError;

/// server messages that belong to the expected redirect-to-login flow and
/// never reach the user as a notification
pub const SUPPRESSED_MESSAGES: [&str; 4] = [
    "authorization header missing",
    "token expired",
    "no token provided",
    "jwt expired",
];

pub const UNREACHABLE_MESSAGE: &str = "Server unreachable, check the connection and try again";
pub const FALLBACK_MESSAGE: &str = "Something went wrong, please try again";

/// how a failed request is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// connect failure or timeout
    Unreachable,
    /// missing or expired credentials, handled by sending the user to login
    Auth,
    /// the server refused the request and said why
    Rejected,
    /// anything the client did not expect
    Unexpected,
    /// the caller gave up on the request
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("server unreachable")]
    Unreachable(#[source] reqwest::Error),

    #[error("{status}: {error}")]
    Api {
        status: StatusCode,
        error: ApiError,
    },

    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RequestError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            RequestError::Unreachable(err)
        } else {
            RequestError::Reqwest(err)
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RequestError::Unreachable(_) => ErrorClass::Unreachable,
            RequestError::Cancelled => ErrorClass::Cancelled,
            RequestError::Api { error, .. } => if is_suppressed_message(error.message()) {
                ErrorClass::Auth
            } else {
                ErrorClass::Rejected
            },
            RequestError::InvalidBody(_) |
            RequestError::Reqwest(_) |
            RequestError::Url(_) |
            RequestError::Json(_) |
            RequestError::Io(_) => ErrorClass::Unexpected,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            RequestError::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// the server refused the credentials attached to the request
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    /// text to show the user, `None` when the error is kept quiet
    pub fn user_message(&self) -> Option<String> {
        match self.class() {
            ErrorClass::Unreachable => Some(UNREACHABLE_MESSAGE.to_owned()),
            ErrorClass::Auth |
            ErrorClass::Cancelled => None,
            ErrorClass::Rejected => self.as_api().map(|e| e.message().to_owned()),
            ErrorClass::Unexpected => Some(FALLBACK_MESSAGE.to_owned()),
        }
    }
}

pub fn is_suppressed_message(message: &str) -> bool {
    let lower = message.trim().to_lowercase();

    SUPPRESSED_MESSAGES.iter().any(|quiet| lower.contains(quiet))
}
