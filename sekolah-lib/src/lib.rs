pub mod error;
pub mod level;
pub mod query;
pub mod sec;
pub mod token;
pub mod validation;

pub use level::Level;
