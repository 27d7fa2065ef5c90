pub mod role;
pub mod scope;

pub use role::Role;
pub use scope::{Scope, Access, allowed_scopes, can_access};
