#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use sekolah_api::client::ApiClient;
use sekolah_api::client::notify::{Notice, NoticeId, NoticeKind, Notifier};
use sekolah_api::client::session::{Navigator, Session};
use sekolah_api::client::token::{MemoryTokenStore, TokenStore};
use sekolah_lib::token;

pub const PREFIX: &str = "/api/v1/";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub status: StatusCode,
    pub body: String,
}

impl Failure {
    pub fn message(status: StatusCode, message: &str) -> Self {
        Failure {
            status,
            body: json!({"message": message}).to_string(),
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Failure {
            status,
            body: body.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub email: String,
    pub password: String,
    pub token: String,
    pub user: Value,
}

/// in memory stand in for the school api. records are kept for one
/// collection, `pengumuman`.
#[derive(Debug, Default)]
pub struct Backend {
    pub requests: Vec<Recorded>,
    pub accounts: Vec<Account>,
    pub records: Vec<Value>,
    pub next_id: i64,
    pub write_delay: Option<Duration>,
    pub failures: HashMap<(Method, String), Failure>,
    /// ids go out as json strings instead of numbers
    pub string_ids: bool,
    /// accepted writes answer with only a message
    pub bare_writes: bool,
}

impl Backend {
    pub fn add_account(&mut self, id: i64, email: &str, password: &str, role: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let token = token::unsigned(&json!({"sub": id, "exp": exp}));

        self.accounts.push(Account {
            email: email.to_owned(),
            password: password.to_owned(),
            token: token.clone(),
            user: json!({
                "id": id,
                "username": email.split('@').next().unwrap_or(email),
                "email": email,
                "role": role,
            }),
        });

        token
    }

    pub fn add_record(&mut self, title: &str, jenjang: Option<&str>) -> i64 {
        self.next_id += 1;

        let mut record = json!({
            "id": self.next_id,
            "title": title,
            "content": format!("isi {}", title),
            "isPublished": false,
        });

        if let Some(tag) = jenjang {
            record["jenjang"] = json!(tag);
        }

        self.records.push(record);
        self.next_id
    }

    pub fn fail(&mut self, method: Method, path: &str, failure: Failure) {
        self.failures.insert((method, path.to_owned()), failure);
    }

    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests.iter()
            .filter(|r| &r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn present(&self, record: &Value) -> Value {
        let mut record = record.clone();

        if self.string_ids {
            if let Some(id) = record["id"].as_i64() {
                record["id"] = json!(id.to_string());
            }
        }

        record
    }

    fn written(&self, msg: &str, record: Option<&Value>) -> Response {
        if self.bare_writes {
            return message(StatusCode::OK, msg);
        }

        let status = if msg == "Pengumuman dibuat" {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };

        reply(status, json!({
            "message": msg,
            "data": record.map(|r| self.present(r)),
        }))
    }

    fn account_for(&self, authorization: Option<&str>) -> Option<&Account> {
        let token = authorization?.strip_prefix("Bearer ")?;

        self.accounts.iter().find(|a| a.token == token)
    }
}

type Shared = Arc<Mutex<Backend>>;

fn reply(status: StatusCode, body: Value) -> Response {
    (status, [("content-type", "application/json")], body.to_string()).into_response()
}

fn message(status: StatusCode, msg: &str) -> Response {
    reply(status, json!({"message": msg}))
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().strip_prefix(PREFIX).unwrap_or(uri.path()).to_owned();
    let query: HashMap<String, String> = url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
        .into_owned()
        .collect();
    let authorization = headers.get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let delay = {
        let mut backend = state.lock().unwrap();

        backend.requests.push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query: query.clone(),
            authorization: authorization.clone(),
        });

        if let Some(failure) = backend.failures.get(&(method.clone(), path.clone())) {
            return (failure.status, failure.body.clone()).into_response();
        }

        if method != Method::GET {
            backend.write_delay
        } else {
            None
        }
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut backend = state.lock().unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let segments: Vec<&str> = path.split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["auth", "login"]) => {
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();

            match backend.accounts.iter().find(|a| a.email == email && a.password == password) {
                Some(account) => reply(StatusCode::OK, json!({
                    "message": "Login berhasil",
                    "data": {"token": account.token, "user": account.user},
                })),
                None => message(StatusCode::UNAUTHORIZED, "Invalid credentials"),
            }
        }
        ("GET", ["auth", "auth-status"]) => {
            if authorization.is_none() {
                return message(StatusCode::UNAUTHORIZED, "Authorization header missing");
            }

            match backend.account_for(authorization.as_deref()) {
                Some(account) => reply(StatusCode::OK, json!({"data": {"user": account.user}})),
                None => message(StatusCode::UNAUTHORIZED, "Token expired"),
            }
        }
        ("POST", ["auth", "forgot-password"]) => {
            message(StatusCode::OK, "Link reset password telah dikirim")
        }
        ("POST", ["auth", "reset-password"]) => {
            if body["newPassword"].is_string() {
                message(StatusCode::OK, "Password berhasil diubah")
            } else {
                message(StatusCode::BAD_REQUEST, "newPassword is required")
            }
        }
        (_, ["pengumuman", ..]) if backend.account_for(authorization.as_deref()).is_none() => {
            message(StatusCode::UNAUTHORIZED, "No token provided")
        }
        ("GET", ["pengumuman"]) => {
            let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
            let limit: usize = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10).max(1);
            let total = backend.records.len();
            let total_pages = (total + limit - 1) / limit;
            let data: Vec<Value> = backend.records.iter()
                .skip((page - 1) * limit)
                .take(limit)
                .map(|r| backend.present(r))
                .collect();

            reply(StatusCode::OK, json!({
                "message": "ok",
                "metadata": {
                    "totalItems": total,
                    "totalPages": total_pages,
                    "currentPage": page,
                    "limit": limit,
                },
                "data": data,
            }))
        }
        ("POST", ["pengumuman"]) => {
            let Some(title) = body["title"].as_str() else {
                return message(StatusCode::BAD_REQUEST, "Judul wajib diisi");
            };
            let title = title.to_owned();
            let id = backend.add_record(&title, body["jenjang"].as_str());
            let record = backend.records.iter().find(|r| r["id"] == json!(id)).cloned();

            backend.written("Pengumuman dibuat", record.as_ref())
        }
        ("PUT" | "PATCH", ["pengumuman", id]) => {
            let id: i64 = id.parse().unwrap_or_default();

            let updated = match backend.records.iter_mut().find(|r| r["id"] == json!(id)) {
                Some(record) => {
                    if let (Some(target), Some(fields)) = (record.as_object_mut(), body.as_object()) {
                        for (key, value) in fields {
                            target.insert(key.clone(), value.clone());
                        }
                    }

                    record.clone()
                }
                None => return message(StatusCode::NOT_FOUND, "Pengumuman tidak ditemukan"),
            };

            backend.written("Pengumuman diperbarui", Some(&updated))
        }
        ("DELETE", ["pengumuman", id]) => {
            let id: i64 = id.parse().unwrap_or_default();
            let before = backend.records.len();

            backend.records.retain(|r| r["id"] != json!(id));

            if backend.records.len() < before {
                message(StatusCode::OK, "Pengumuman dihapus")
            } else {
                message(StatusCode::NOT_FOUND, "Pengumuman tidak ditemukan")
            }
        }
        _ => message(StatusCode::NOT_FOUND, "Not found"),
    }
}

pub async fn spawn_backend(backend: Backend) -> (SocketAddr, Shared) {
    let state: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .fallback(handle)
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

/// an address nothing listens on
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    listener.local_addr().unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Show(NoticeId, Notice),
    Update(NoticeId, Notice),
    Dismiss(NoticeId),
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    next: AtomicU64,
    events: Mutex<Vec<Event>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// messages of every notice of `kind` that was shown or updated to
    pub fn messages(&self, kind: NoticeKind) -> Vec<String> {
        self.events().into_iter()
            .filter_map(|event| match event {
                Event::Show(_, notice) |
                Event::Update(_, notice) if notice.kind == kind => Some(notice.message),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(NoticeKind::Error)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(NoticeKind::Success)
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notice: Notice) -> NoticeId {
        let id = NoticeId(self.next.fetch_add(1, Ordering::Relaxed));

        self.events.lock().unwrap().push(Event::Show(id, notice));

        id
    }

    fn update(&self, id: NoticeId, notice: Notice) {
        self.events.lock().unwrap().push(Event::Update(id, notice));
    }

    fn dismiss(&self, id: NoticeId) {
        self.events.lock().unwrap().push(Event::Dismiss(id));
    }
}

#[derive(Debug, Default)]
pub struct CountingNavigator {
    count: AtomicUsize,
}

impl CountingNavigator {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Navigator for CountingNavigator {
    fn to_login(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct Harness {
    pub addr: SocketAddr,
    pub backend: Shared,
    pub notifier: Arc<RecordingNotifier>,
    pub tokens: Arc<MemoryTokenStore>,
    pub navigator: Arc<CountingNavigator>,
    pub session: Arc<Session>,
}

impl Harness {
    pub fn api(&self) -> &ApiClient {
        self.session.api()
    }

    pub fn backend(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    pub fn stored_token(&self) -> Option<String> {
        self.tokens.load()
    }
}

pub fn client_for(
    addr: SocketAddr,
    timeout: Duration,
    tokens: Arc<MemoryTokenStore>,
    notifier: Arc<RecordingNotifier>,
) -> ApiClient {
    let mut builder = ApiClient::builder();
    builder.url(url::Url::parse(&format!("http://{}{}", addr, PREFIX)).unwrap());
    builder.timeout(timeout);
    builder.tokens(tokens);
    builder.notifier(notifier);

    builder.build().unwrap()
}

pub async fn harness_with(backend: Backend, timeout: Duration) -> Harness {
    let (addr, backend) = spawn_backend(backend).await;
    let notifier = Arc::new(RecordingNotifier::default());
    let tokens = Arc::new(MemoryTokenStore::new());
    let navigator = Arc::new(CountingNavigator::default());

    let api = client_for(addr, timeout, tokens.clone(), notifier.clone());
    let session = Arc::new(Session::new(api, navigator.clone()));

    Harness {
        addr,
        backend,
        notifier,
        tokens,
        navigator,
        session,
    }
}

pub async fn harness(backend: Backend) -> Harness {
    harness_with(backend, Duration::from_secs(5)).await
}
