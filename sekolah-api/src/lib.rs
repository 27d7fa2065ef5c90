pub mod error;
pub use error::{ApiError, FieldError};

mod payload;
pub use payload::{Payload, PayloadParts, Message};

pub mod auth;
pub mod resources;
pub use resources::{Id, Resource};

#[cfg(feature = "client")]
pub mod client;
