use std::path::PathBuf;

use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use super::error::RequestError;

/// a local file sent along with a write under the given form field
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub field: String,
    pub path: PathBuf,
}

impl FileUpload {
    pub fn new<F, P>(field: F, path: P) -> Self
    where
        F: Into<String>,
        P: Into<PathBuf>,
    {
        FileUpload {
            field: field.into(),
            path: path.into(),
        }
    }
}

/// request body of a write
#[derive(Debug)]
pub enum Body {
    Json(Value),
    Multipart(Form),
}

impl Body {
    pub fn json<S>(value: &S) -> Result<Self, RequestError>
    where
        S: Serialize + ?Sized
    {
        Ok(Body::Json(serde_json::to_value(value)?))
    }

    /// json unless a file is attached, in which case every field becomes a
    /// text part next to the file part
    pub async fn from_parts(fields: Value, file: Option<&FileUpload>) -> Result<Self, RequestError> {
        let Some(upload) = file else {
            return Ok(Body::Json(fields));
        };

        let map = match fields {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            _ => return Err(RequestError::InvalidBody(
                "form fields must be a json object".into()
            )),
        };

        let mut form = Form::new();

        for (key, value) in map {
            if let Some(text) = field_text(&value) {
                form = form.text(key, text);
            }
        }

        let bytes = tokio::fs::read(&upload.path).await?;
        let file_name = upload.path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| upload.field.clone());
        let mime = mime_guess::from_path(&upload.path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())?;

        Ok(Body::Multipart(form.part(upload.field.clone(), part)))
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Multipart(_))
    }

    pub(crate) fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        }
    }
}

/// text form of a json value for a multipart field, nulls are left out
fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) |
        Value::Object(_) => Some(value.to_string()),
    }
}
