use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::{ApiError, Payload, Message};

pub mod error;
pub mod notify;
pub mod token;
pub mod body;
pub mod session;
pub mod editor;

use error::{ErrorClass, RequestError};
use notify::{Notice, Notifier, TracingNotifier};
use token::{TokenStore, MemoryTokenStore};
use body::Body;

pub const DEFAULT_URL: &str = "http://localhost/api/v1/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const PENDING_MESSAGE: &str = "Saving...";
pub const SAVED_MESSAGE: &str = "Saved";
pub const DELETED_MESSAGE: &str = "Deleted";

pub struct Info {
    pub url: Url
}

struct Shared {
    client: reqwest::Client,
    info: Info,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

/// authenticated access to the backend. cloning is cheap and every clone
/// shares the same connection pool, token store, and notifier.
#[derive(Clone)]
pub struct ApiClient {
    shared: Arc<Shared>,
    cancel: Option<CancellationToken>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder {
            url: None,
            timeout: DEFAULT_TIMEOUT,
            agent: None,
            tokens: None,
            notifier: None,
        }
    }

    pub fn info(&self) -> &Info {
        &self.shared.info
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.shared.notifier
    }

    pub(crate) fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.shared.tokens
    }

    /// a client whose requests give up once `token` is cancelled
    pub fn scoped(&self, token: CancellationToken) -> ApiClient {
        ApiClient {
            shared: self.shared.clone(),
            cancel: Some(token),
        }
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    fn url<U>(&self, path: U) -> Result<Url, RequestError>
    where
        U: AsRef<str>
    {
        Ok(self.shared.info.url.join(path.as_ref().trim_start_matches('/'))?)
    }

    fn request<U>(&self, method: Method, path: U) -> Result<RequestBuilder, RequestError>
    where
        U: AsRef<str>
    {
        let url = self.url(path)?;

        tracing::debug!("{} {}", method, url);

        let builder = self.shared.client.request(method, url);

        Ok(match self.shared.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn until_cancelled<F, T>(&self, fut: F) -> Result<T, RequestError>
    where
        F: Future<Output = Result<T, reqwest::Error>>
    {
        let result = match &self.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(RequestError::Cancelled),
                res = fut => res,
            },
            None => fut.await,
        };

        result.map_err(RequestError::from_transport)
    }

    async fn api_error(&self, res: Response) -> RequestError {
        let status = res.status();
        let bytes = match self.until_cancelled(res.bytes()).await {
            Ok(b) => b,
            Err(err) => return err,
        };

        let error = serde_json::from_slice::<ApiError>(&bytes)
            .unwrap_or_else(|_| ApiError::new(
                status.canonical_reason().unwrap_or("request failed")
            ));

        RequestError::Api { status, error }
    }

    /// sends the request and hands back the response once it is known to
    /// be a success
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Body>,
    ) -> Result<Response, RequestError> {
        let mut builder = self.request(method, path)?;

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(body) = body {
            builder = body.apply(builder);
        }

        let res = self.until_cancelled(builder.send()).await?;

        if !res.status().is_success() {
            return Err(self.api_error(res).await);
        }

        Ok(res)
    }

    async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Body>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned
    {
        let res = self.send(method, path, query, body).await?;
        let bytes = self.until_cancelled(res.bytes()).await?;

        if bytes.is_empty() {
            Ok(serde_json::from_slice(b"null")?)
        } else {
            Ok(serde_json::from_slice(&bytes)?)
        }
    }

    /// notifies the user about a failed call unless the failure is meant to
    /// stay quiet
    fn report(&self, err: &RequestError) {
        match err.class() {
            ErrorClass::Auth => tracing::warn!("suppressed auth failure: {}", err),
            ErrorClass::Cancelled => tracing::debug!("request cancelled"),
            ErrorClass::Unreachable => tracing::warn!("{:#?}", err),
            ErrorClass::Rejected => tracing::debug!("request rejected: {}", err),
            ErrorClass::Unexpected => tracing::error!("unexpected request failure: {:#?}", err),
        }

        if let Some(msg) = err.user_message() {
            self.shared.notifier.show(Notice::error(msg));
        }
    }

    pub async fn get<T>(&self, path: &str) -> Result<Payload<T>, RequestError>
    where
        T: DeserializeOwned
    {
        self.get_with(path, &[]).await
    }

    pub async fn get_with<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Payload<T>, RequestError>
    where
        T: DeserializeOwned
    {
        let result = self.send_json(Method::GET, path, query, None).await;

        if let Err(err) = &result {
            self.report(err);
        }

        result
    }

    /// the returned data is `None` when the server accepted the write
    /// without sending back a record it could be decoded into
    pub async fn post<T>(&self, path: &str, body: Body) -> Result<Payload<Option<T>>, RequestError>
    where
        T: DeserializeOwned
    {
        self.write(Method::POST, path, body).await
    }

    pub async fn put<T>(&self, path: &str, body: Body) -> Result<Payload<Option<T>>, RequestError>
    where
        T: DeserializeOwned
    {
        self.write(Method::PUT, path, body).await
    }

    pub async fn patch<T>(&self, path: &str, body: Body) -> Result<Payload<Option<T>>, RequestError>
    where
        T: DeserializeOwned
    {
        self.write(Method::PATCH, path, body).await
    }

    async fn write<T>(&self, method: Method, path: &str, body: Body) -> Result<Payload<Option<T>>, RequestError>
    where
        T: DeserializeOwned
    {
        let notifier = &self.shared.notifier;
        let pending = notifier.show(Notice::pending(PENDING_MESSAGE));

        let result = match self.send(method, path, &[], Some(body)).await {
            Ok(res) => self.until_cancelled(res.bytes()).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(bytes) => {
                let payload = accepted::<T>(&bytes);
                let msg = payload.message().unwrap_or(SAVED_MESSAGE);

                notifier.update(pending, Notice::success(msg));

                Ok(payload)
            }
            Err(err) => {
                if err.class() == ErrorClass::Unexpected {
                    tracing::error!("unexpected request failure: {:#?}", err);
                }

                match err.user_message() {
                    Some(msg) => notifier.update(pending, Notice::error(msg)),
                    None => notifier.dismiss(pending),
                }

                Err(err)
            }
        }
    }

    /// returns the server's message, if it sent one
    pub async fn delete(&self, path: &str, body: Option<Body>) -> Result<Option<String>, RequestError> {
        let result = self.send_json::<Option<Message>>(Method::DELETE, path, &[], body).await;

        match result {
            Ok(msg) => {
                let msg = msg.and_then(|m| m.message);

                self.shared.notifier.show(Notice::success(
                    msg.as_deref().unwrap_or(DELETED_MESSAGE)
                ));

                Ok(msg)
            }
            Err(err) => {
                self.report(&err);

                Err(err)
            }
        }
    }
}

/// reads the body of a successful write. the server has already applied
/// the change at this point so nothing in the body turns it into a failure,
/// a body that does not match the envelope only loses its message or data.
fn accepted<T>(bytes: &[u8]) -> Payload<Option<T>>
where
    T: DeserializeOwned
{
    if bytes.is_empty() {
        return Payload::new(None);
    }

    let envelope = match serde_json::from_slice::<Payload<Option<serde_json::Value>>>(bytes) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!("write accepted with an unexpected body: {}", err);

            return Payload::new(None);
        }
    };

    let (message, metadata, data) = envelope.into_parts();

    let data = data.and_then(|value| match serde_json::from_value::<T>(value) {
        Ok(data) => Some(data),
        Err(err) => {
            tracing::warn!("write accepted but the returned data did not decode: {}", err);

            None
        }
    });

    let mut payload = Payload::new(data);

    if let Some(message) = message {
        payload = payload.with_message(message);
    }

    if let Some(metadata) = metadata {
        payload = payload.with_metadata(metadata);
    }

    payload
}

pub struct ApiClientBuilder {
    url: Option<Url>,
    timeout: Duration,
    agent: Option<String>,
    tokens: Option<Arc<dyn TokenStore>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ApiClientBuilder {
    /// base url of the api, a missing trailing slash is added so relative
    /// paths join under it
    pub fn url(&mut self, mut url: Url) {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());

            url.set_path(&path);
        }

        self.url = Some(url);
    }

    pub fn timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn user_agent<U>(&mut self, user_agent: U)
    where
        U: Into<String>
    {
        self.agent = Some(user_agent.into());
    }

    pub fn tokens(&mut self, tokens: Arc<dyn TokenStore>) {
        self.tokens = Some(tokens);
    }

    pub fn notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifier = Some(notifier);
    }

    pub fn build(self) -> Result<ApiClient, RequestError> {
        let url = match self.url {
            Some(url) => url,
            None => Url::parse(DEFAULT_URL)?,
        };
        let user_agent = self.agent.unwrap_or("sekolah-api-client/0.1.0".into());

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(self.timeout)
            .build()?;

        Ok(ApiClient {
            shared: Arc::new(Shared {
                client,
                info: Info { url },
                tokens: self.tokens.unwrap_or_else(|| Arc::new(MemoryTokenStore::new())),
                notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier::default())),
            }),
            cancel: None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let mut builder = ApiClient::builder();
        builder.url(Url::parse("http://school.test/api/v1").unwrap());

        let client = builder.build().unwrap();

        assert_eq!(client.info().url.as_str(), "http://school.test/api/v1/");
        assert_eq!(
            client.url("/pengumuman/3").unwrap().as_str(),
            "http://school.test/api/v1/pengumuman/3"
        );
        assert_eq!(
            client.url("auth/login").unwrap().as_str(),
            "http://school.test/api/v1/auth/login"
        );
    }

    #[test]
    fn default_base_url() {
        let client = ApiClient::builder().build().unwrap();

        assert_eq!(client.info().url.as_str(), DEFAULT_URL);
    }

    #[derive(Debug, serde::Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn accepted_write_bodies() {
        let full = accepted::<Named>(br#"{"message": "Disimpan", "data": {"name": "a"}}"#);
        assert_eq!(full.message(), Some("Disimpan"));
        assert_eq!(full.data().as_ref().map(|n| n.name.as_str()), Some("a"));

        let message_only = accepted::<Named>(br#"{"message": "Pengumuman diperbarui"}"#);
        assert_eq!(message_only.message(), Some("Pengumuman diperbarui"));
        assert!(message_only.data().is_none());

        let wrong_shape = accepted::<Named>(br#"{"message": "ok", "data": [1, 2]}"#);
        assert_eq!(wrong_shape.message(), Some("ok"));
        assert!(wrong_shape.data().is_none());

        for body in [&b""[..], &b"null"[..], &b"OK"[..], &b"[]"[..]] {
            let payload = accepted::<Named>(body);

            assert!(payload.message().is_none(), "{:?}", body);
            assert!(payload.data().is_none(), "{:?}", body);
        }
    }
}
