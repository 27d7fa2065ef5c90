use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sekolah_api::client::ApiClient;
use sekolah_api::client::session::{Navigator, Session};
use sekolah_api::client::token::FileTokenStore;

use crate::config::Settings;
use crate::error::{self, Context};
use crate::notify::TerminalNotifier;

/// set whenever the session asks to be sent back to the login prompt
#[derive(Debug, Default)]
pub struct Relogin {
    requested: AtomicBool,
}

impl Relogin {
    /// true once per request
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

impl Navigator for Relogin {
    fn to_login(&self) {
        tracing::debug!("login requested");

        self.requested.store(true, Ordering::SeqCst);
    }
}

pub struct AppState {
    pub settings: Settings,
    pub session: Arc<Session>,
    pub relogin: Arc<Relogin>,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> error::Result<Self> {
        let mut builder = ApiClient::builder();
        builder.url(settings.api_url.clone());
        builder.timeout(settings.timeout);
        builder.user_agent(concat!("sekolah/", env!("CARGO_PKG_VERSION")));
        builder.tokens(Arc::new(FileTokenStore::new(settings.token_file.clone())));
        builder.notifier(Arc::new(TerminalNotifier::default()));

        let api = builder.build().context("failed to create api client")?;
        let relogin = Arc::new(Relogin::default());
        let session = Arc::new(Session::new(api, relogin.clone()));

        Ok(AppState {
            settings,
            session,
            relogin,
        })
    }
}
