//! the one authenticated session of the process
//!
//! every authorization decision reads the identity from here. the token
//! itself stays in the client's token store and is only touched by this
//! module.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use sekolah_lib::sec::{Role, Scope};
use sekolah_lib::{token, validation};

use crate::auth::{AuthStatus, ForgotPassword, LoginBody, LoginResult, ResetPassword, UserInfo};

use super::ApiClient;
use super::body::Body;
use super::error::RequestError;
use super::notify::Notice;

pub const LOGIN_PATH: &str = "auth/login";
pub const AUTH_STATUS_PATH: &str = "auth/auth-status";
pub const FORGOT_PASSWORD_PATH: &str = "auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "auth/reset-password";

pub const LOGGED_OUT_MESSAGE: &str = "Logged out";

/// moves the user to the login screen
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

/// for front ends without a login screen to move to
#[derive(Debug, Default)]
pub struct NoNavigation;

impl Navigator for NoNavigation {
    fn to_login(&self) {}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<UserInfo>,
    pub expiry: Option<DateTime<Utc>>,
    pub loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// logged out users are allowed nothing
    pub fn scope(&self) -> Scope {
        self.user.as_ref()
            .map(UserInfo::scope)
            .unwrap_or_else(Scope::none)
    }
}

/// sets `loading` for as long as it is alive
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a watch::Sender<SessionState>) -> Self {
        state.send_modify(|s| s.loading = true);

        LoadingGuard { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

pub struct Session {
    api: ApiClient,
    state: watch::Sender<SessionState>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        let (state, _) = watch::channel(SessionState::default());

        Session {
            api,
            state,
            navigator,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().user.clone()
    }

    /// role string as the backend sent it
    pub fn role(&self) -> Option<String> {
        self.state.borrow().user.as_ref().map(|u| u.role.clone())
    }

    pub fn canonical_role(&self) -> Option<Role> {
        self.state.borrow().user.as_ref().and_then(UserInfo::canonical_role)
    }

    pub fn scope(&self) -> Scope {
        self.state.borrow().scope()
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().expiry
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    fn adopt(&self, user: UserInfo, token: &str) {
        let expiry = match token::expiry(token) {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("session token has no readable expiry: {}", err);

                None
            }
        };

        self.state.send_modify(|s| {
            s.user = Some(user);
            s.expiry = expiry;
        });
    }

    fn end_session(&self) {
        if let Err(err) = self.api.tokens().clear() {
            tracing::warn!("failed to clear session token: {}", err);
        }

        self.state.send_modify(|s| {
            s.user = None;
            s.expiry = None;
        });
    }

    /// `None` on any failure, the client has already told the user why
    pub async fn login(&self, email: &str, password: &str) -> Option<UserInfo> {
        let body = LoginBody {
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };

        if !body.valid() {
            tracing::debug!("login refused locally: {:?}", body);

            return None;
        }

        let body = match Body::json(&body) {
            Ok(b) => b,
            Err(err) => {
                tracing::error!("failed to encode login body: {}", err);

                return None;
            }
        };

        let result = match self.api.post::<LoginResult>(LOGIN_PATH, body).await {
            Ok(payload) => match payload.into_data() {
                Some(result) => result,
                None => {
                    tracing::warn!("login accepted without a token");

                    return None;
                }
            },
            Err(err) => {
                tracing::debug!("login failed: {}", err);

                return None;
            }
        };

        if let Err(err) = self.api.tokens().save(&result.token) {
            tracing::error!("failed to persist session token: {}", err);

            return None;
        }

        tracing::info!(
            user = %result.user.username,
            role = %result.user.role,
            "logged in"
        );

        self.adopt(result.user.clone(), &result.token);

        Some(result.user)
    }

    pub fn logout(&self) {
        self.end_session();

        self.api.notifier().show(Notice::success(LOGGED_OUT_MESSAGE));
        self.navigator.to_login();
    }

    /// restores the session from the stored token. true once the server
    /// has confirmed who the token belongs to.
    pub async fn checking_session(&self) -> bool {
        let _loading = LoadingGuard::start(&self.state);

        let Some(stored) = self.api.tokens().load() else {
            tracing::debug!("no stored session token");

            self.state.send_modify(|s| {
                s.user = None;
                s.expiry = None;
            });

            return false;
        };

        match token::is_expired(&stored, Utc::now()) {
            Ok(false) => {}
            Ok(true) => {
                tracing::info!("stored session token expired");

                self.logout();

                return false;
            }
            Err(err) => {
                tracing::warn!("stored session token unreadable: {}", err);

                self.logout();

                return false;
            }
        }

        match self.api.get::<AuthStatus>(AUTH_STATUS_PATH).await {
            Ok(payload) => {
                self.adopt(payload.into_data().user, &stored);

                true
            }
            Err(err) if err.is_auth_rejection() => {
                tracing::info!("server refused stored session: {}", err);

                self.end_session();
                self.navigator.to_login();

                false
            }
            Err(err) => {
                tracing::warn!("could not confirm session: {}", err);

                self.state.send_modify(|s| {
                    s.user = None;
                    s.expiry = None;
                });

                false
            }
        }
    }

    pub async fn forgot_password(&self, email: &str) -> Result<Option<String>, RequestError> {
        let email = email.trim();

        if !validation::email_valid(email) {
            return Err(RequestError::InvalidBody("invalid email address".into()));
        }

        let body = Body::json(&ForgotPassword { email: email.to_owned() })?;
        let payload = self.api.post::<serde_json::Value>(FORGOT_PASSWORD_PATH, body).await?;

        Ok(payload.message().map(str::to_owned))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<Option<String>, RequestError> {
        let body = ResetPassword {
            token: token.trim().to_owned(),
            new_password: new_password.to_owned(),
        };

        if !body.valid() {
            return Err(RequestError::InvalidBody("invalid reset token or password".into()));
        }

        let payload = self.api.post::<serde_json::Value>(RESET_PASSWORD_PATH, Body::json(&body)?).await?;

        Ok(payload.message().map(str::to_owned))
    }
}
