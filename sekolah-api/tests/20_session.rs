mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use sekolah_api::client::error::RequestError;
use sekolah_api::client::session::LOGGED_OUT_MESSAGE;
use sekolah_api::client::token::TokenStore;
use sekolah_api::resources::Announcement;
use sekolah_lib::sec::{Role, Scope};
use sekolah_lib::{Level, token};

use common::{Backend, Failure};

fn backend_with_principal() -> (Backend, String) {
    let mut backend = Backend::default();
    let token = backend.add_account(7, "kepsek.sd@sekolah.sch.id", "rahasia", "Kepala Sekolah SD");

    (backend, token)
}

#[tokio::test]
async fn login_persists_token_and_authenticates_requests() {
    let (backend, token) = backend_with_principal();
    let h = common::harness(backend).await;

    let user = h.session.login("kepsek.sd@sekolah.sch.id", "rahasia").await
        .expect("login should succeed");

    assert_eq!(user.role, "Kepala Sekolah SD");
    assert_eq!(h.stored_token(), Some(token.clone()));
    assert!(h.session.is_authenticated());
    assert_eq!(h.session.canonical_role(), Some(Role::Principal(Level::Sd)));
    assert!(h.session.expiry().is_some());

    h.api().get::<Vec<Announcement>>("pengumuman").await.unwrap();

    let requests = h.backend().requests_to(&Method::GET, "pengumuman");
    assert_eq!(requests[0].authorization, Some(format!("Bearer {}", token)));
}

#[tokio::test]
async fn login_with_wrong_password() {
    let (backend, _) = backend_with_principal();
    let h = common::harness(backend).await;

    let user = h.session.login("kepsek.sd@sekolah.sch.id", "salah").await;

    assert!(user.is_none());
    assert_eq!(h.stored_token(), None);
    assert!(!h.session.is_authenticated());
    assert_eq!(h.notifier.errors(), vec!["Invalid credentials".to_owned()]);
}

#[tokio::test]
async fn login_input_checked_locally() {
    let (backend, _) = backend_with_principal();
    let h = common::harness(backend).await;

    let cases = [
        ("not-an-email", "rahasia"),
        ("kepsek.sd@sekolah.sch.id", ""),
        ("", ""),
    ];

    for (email, password) in cases {
        assert!(h.session.login(email, password).await.is_none(), "login({:?}, {:?})", email, password);
    }

    assert!(h.backend().requests.is_empty(), "no request for invalid input");
}

#[tokio::test]
async fn logout_clears_everything() {
    let (backend, _) = backend_with_principal();
    let h = common::harness(backend).await;

    h.session.login("kepsek.sd@sekolah.sch.id", "rahasia").await.unwrap();
    h.notifier.clear();

    h.session.logout();

    assert_eq!(h.stored_token(), None);
    assert!(h.session.user().is_none());
    assert_eq!(h.session.scope(), Scope::none());
    assert_eq!(h.notifier.successes(), vec![LOGGED_OUT_MESSAGE.to_owned()]);
    assert_eq!(h.navigator.count(), 1);
}

#[tokio::test]
async fn restore_without_token() {
    let h = common::harness(Backend::default()).await;

    assert!(!h.session.checking_session().await);
    assert!(!h.session.is_loading());
    assert!(h.backend().requests.is_empty());
}

#[tokio::test]
async fn restore_with_expired_token() {
    let h = common::harness(Backend::default()).await;
    let expired = token::unsigned(&json!({"sub": 1, "exp": chrono::Utc::now().timestamp() - 60}));
    h.tokens.save(&expired).unwrap();

    assert!(!h.session.checking_session().await);

    assert_eq!(h.stored_token(), None, "expired token cleared");
    assert!(!h.session.is_authenticated());
    assert!(!h.session.is_loading());
    assert_eq!(h.navigator.count(), 1);
    assert!(h.backend().requests.is_empty(), "expired token never sent");
}

#[tokio::test]
async fn restore_with_unreadable_token() {
    let h = common::harness(Backend::default()).await;
    h.tokens.save("garbage").unwrap();

    assert!(!h.session.checking_session().await);
    assert_eq!(h.stored_token(), None);
    assert!(h.backend().requests.is_empty());
}

#[tokio::test]
async fn restore_with_confirmed_token() {
    let (backend, token) = backend_with_principal();
    let h = common::harness(backend).await;
    h.tokens.save(&token).unwrap();

    let mut rx = h.session.subscribe();

    assert!(h.session.checking_session().await);

    let user = h.session.user().expect("user populated");
    assert_eq!(user.email, "kepsek.sd@sekolah.sch.id");
    assert!(!h.session.is_loading());
    assert!(h.session.scope().permits("SD"));
    assert!(!h.session.scope().permits("SMP"));

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert!(seen.is_authenticated());
    assert!(!seen.loading);

    let requests = h.backend().requests_to(&Method::GET, "auth/auth-status");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, Some(format!("Bearer {}", token)));
}

#[tokio::test]
async fn restore_rejected_by_server() {
    let h = common::harness(Backend::default()).await;
    let unknown = token::unsigned(&json!({"sub": 99, "exp": chrono::Utc::now().timestamp() + 600}));
    h.tokens.save(&unknown).unwrap();

    assert!(!h.session.checking_session().await);

    assert_eq!(h.stored_token(), None);
    assert_eq!(h.navigator.count(), 1);
    assert!(h.notifier.errors().is_empty(), "token expired is not shown");
    assert!(!h.session.is_loading());
}

#[tokio::test]
async fn restore_during_server_failure_keeps_token() {
    let (mut backend, token) = backend_with_principal();
    backend.fail(
        Method::GET,
        "auth/auth-status",
        Failure::message(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
    );

    let h = common::harness(backend).await;
    h.tokens.save(&token).unwrap();

    assert!(!h.session.checking_session().await);

    assert_eq!(h.stored_token(), Some(token));
    assert!(!h.session.is_authenticated());
    assert!(!h.session.is_loading());
    assert_eq!(h.navigator.count(), 0);
    assert_eq!(h.notifier.errors(), vec!["Database error".to_owned()]);
}

#[tokio::test]
async fn failed_recheck_forgets_previous_identity() {
    let (backend, token) = backend_with_principal();
    let h = common::harness(backend).await;

    h.session.login("kepsek.sd@sekolah.sch.id", "rahasia").await
        .expect("login should succeed");
    assert!(h.session.expiry().is_some());

    h.backend().fail(
        Method::GET,
        "auth/auth-status",
        Failure::message(StatusCode::SERVICE_UNAVAILABLE, "Maintenance")
    );

    assert!(!h.session.checking_session().await);

    assert_eq!(h.stored_token(), Some(token));
    assert!(h.session.user().is_none());
    assert!(h.session.expiry().is_none());
    assert!(!h.session.is_authenticated());
}

#[tokio::test]
async fn password_reset_flow() {
    let h = common::harness(Backend::default()).await;

    let msg = h.session.forgot_password("guru@sekolah.sch.id").await.unwrap();
    assert_eq!(msg.as_deref(), Some("Link reset password telah dikirim"));

    let msg = h.session.reset_password("reset-token", "baru123").await.unwrap();
    assert_eq!(msg.as_deref(), Some("Password berhasil diubah"));

    let err = h.session.forgot_password("bukan email").await.unwrap_err();
    assert!(matches!(err, RequestError::InvalidBody(_)));

    assert_eq!(h.backend().requests.len(), 2);
}
