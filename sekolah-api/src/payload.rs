use serde::{Serialize, Deserialize};

use sekolah_lib::query::Metadata;

/// response envelope every endpoint answers with
#[derive(Debug, Serialize, Deserialize)]
pub struct Payload<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Metadata>,

    data: T
}

impl<T> Payload<T> {
    pub fn new(data: T) -> Self {
        Self {
            message: None,
            metadata: None,
            data
        }
    }

    pub fn with_message<M>(mut self, message: M) -> Self
    where
        M: Into<String>
    {
        self.message = Some(message.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn into_parts(self) -> PayloadParts<T> {
        (self.message, self.metadata, self.data)
    }
}

pub type PayloadParts<T> = (Option<String>, Option<Metadata>, T);

/// body of responses that only carry a message, deletes mostly
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: Option<String>,
}
