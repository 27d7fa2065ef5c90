use serde::{Serialize, Deserialize};

/// error body returned by the backend on non 2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(alias = "error")]
    message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new<M>(message: M) -> Self
    where
        M: Into<String>
    {
        ApiError {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;

        for err in self.errors() {
            match &err.field {
                Some(field) => write!(f, "\n  {}: {}", field, err.message)?,
                None => write!(f, "\n  {}", err.message)?,
            }
        }

        Ok(())
    }
}

impl std::error::Error for ApiError {}
