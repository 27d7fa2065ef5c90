use serde::{Serialize, Deserialize};

use sekolah_lib::sec::{Role, Scope, allowed_scopes};
use sekolah_lib::validation;

use crate::resources::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: Id,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl UserInfo {
    /// canonical role, `None` when the backend handed out something unknown
    pub fn canonical_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn scope(&self) -> Scope {
        allowed_scopes(&self.role)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

impl LoginBody {
    pub fn valid(&self) -> bool {
        validation::email_valid(&self.email) && validation::password_valid(&self.password)
    }
}

impl std::fmt::Debug for LoginBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginBody")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    pub token: String,
    pub new_password: String,
}

impl std::fmt::Debug for ResetPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPassword")
            .field("token", &"[redacted]")
            .field("new_password", &"[redacted]")
            .finish()
    }
}

impl ResetPassword {
    pub fn valid(&self) -> bool {
        !self.token.is_empty() && validation::password_valid(&self.new_password)
    }
}
