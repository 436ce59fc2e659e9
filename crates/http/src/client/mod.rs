//! Subs Mania API client
//!
//! [`SubsClient`] attaches the stored access token to every call. A `401` on a
//! fresh request triggers one token renewal, shared by every caller that hits
//! a `401` while it is in flight; each of them is then replayed exactly once
//! with the renewed token. If renewal is impossible the credentials are
//! cleared, the [`SessionTerminator`] fires once and every waiting caller
//! gets [`ClientError::SessionExpired`].

pub mod admin;
pub mod auth;
pub mod config;
pub mod members;
pub mod mypage;
pub mod platforms;
pub mod request;
pub mod reviews;
pub mod session;
pub mod store;
pub mod subscriptions;

pub use config::ClientConfig;
pub use reqwest::StatusCode;
pub use request::{ApiRequest, FormPart, RequestBody};
pub use session::{LogTermination, SessionTerminator};
pub use store::{CredentialStore, KeyValueStore, MemoryStore, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;

use crate::error::{ClientError, SessionEndReason};
use crate::types::{DataEnvelope, TokenRefreshResponse};
use futures::FutureExt;
use futures::future::Shared;
use reqwest::{ClientBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// Header carrying the refresh token on renewal calls
pub const REFRESH_HEADER: &str = "Refresh";

/// `Send + Sync` on native targets, nothing in the single-threaded browser
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

type RenewalOutcome = Result<String, SessionEndReason>;

#[cfg(not(target_arch = "wasm32"))]
type RenewalFuture = futures::future::BoxFuture<'static, RenewalOutcome>;
#[cfg(target_arch = "wasm32")]
type RenewalFuture = futures::future::LocalBoxFuture<'static, RenewalOutcome>;

/// The in-flight renewal, if any. `None` is the idle state.
type RenewalLatch = Mutex<Option<Shared<RenewalFuture>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Subs Mania API client
#[derive(Clone)]
pub struct SubsClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    config: ClientConfig,
    renewal_timeout: Duration,
    credentials: CredentialStore,
    terminator: Arc<dyn SessionTerminator>,
    renewal: Arc<RenewalLatch>,
}

impl std::fmt::Debug for SubsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsClient")
            .field("base_url", &self.inner.config.base_url)
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl SubsClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> SubsClientBuilder {
        SubsClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The persisted session credentials this client reads and renews
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Absolute URL for a server-relative image path such as `/images/a.png`
    pub fn image_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let separator = if path.starts_with('/') { "" } else { "/" };
        format!("{}{separator}{path}", self.base_url())
    }

    /// Send a request, renewing the access token once if it has expired.
    ///
    /// Success responses are returned untouched. Any other status comes back
    /// as [`ClientError::Http`] with the original body.
    pub async fn request(&self, mut request: ApiRequest) -> Result<Response, ClientError> {
        let sent_with = self.inner.credentials.access_token();
        let response = self.dispatch(&request, sent_with.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || !request.is_renewable() {
            return Self::check(response).await;
        }

        request.mark_retried();
        debug!(
            method = %request.method(),
            path = request.path(),
            "Access token rejected, waiting for renewal"
        );

        let token = self.renewed_token(sent_with.as_deref()).await?;
        let response = self.dispatch(&request, Some(&token)).await?;
        Self::check(response).await
    }

    /// Send a request and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let response = self.request(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request and unwrap a `{ "data": ... }` body
    pub async fn execute_data<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let envelope: DataEnvelope<T> = self.execute(request).await?;
        Ok(envelope.data)
    }

    /// Send a request whose body is irrelevant (e.g. `204 No Content`)
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.request(request).await.map(drop)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(path)).await
    }

    /// Renew the access token now, joining a renewal already in flight.
    ///
    /// Used on startup to validate a stored session before any request fails.
    pub async fn renew_access_token(&self) -> Result<String, ClientError> {
        let current = self.inner.credentials.access_token();
        self.renewed_token(current.as_deref()).await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<Response, ClientError> {
        let response = request
            .build(&self.inner.http, self.base_url(), bearer)?
            .send()
            .await?;

        debug!(
            method = %request.method(),
            path = request.path(),
            status = response.status().as_u16(),
            retried = request.is_retried(),
            "API call"
        );
        Ok(response)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::Http { status, body })
        }
    }

    /// A token to replay with after `stale` was rejected.
    async fn renewed_token(&self, stale: Option<&str>) -> Result<String, ClientError> {
        let renewal = {
            let mut slot = lock(&self.inner.renewal);
            match slot.as_ref() {
                Some(in_flight) => in_flight.clone(),
                None => {
                    // Renewed or torn down since the request went out
                    let current = self.inner.credentials.access_token();
                    if current.as_deref() != stale {
                        return current
                            .ok_or(ClientError::SessionExpired(SessionEndReason::LoggedOut));
                    }
                    let renewal = self.start_renewal();
                    *slot = Some(renewal.clone());
                    renewal
                }
            }
        };

        renewal.await.map_err(ClientError::SessionExpired)
    }

    fn start_renewal(&self) -> Shared<RenewalFuture> {
        let renewal = Renewal {
            http: self.inner.http.clone(),
            url: format!("{}{}", self.base_url(), self.inner.config.refresh_path),
            timeout: self.inner.renewal_timeout,
            credentials: self.inner.credentials.clone(),
            terminator: Arc::clone(&self.inner.terminator),
            latch: Arc::downgrade(&self.inner.renewal),
        };

        let future = async move {
            let outcome = renewal.run().await;
            renewal.release();
            outcome
        };

        #[cfg(not(target_arch = "wasm32"))]
        let future = future.boxed();
        #[cfg(target_arch = "wasm32")]
        let future = future.boxed_local();

        future.shared()
    }
}

/// Everything one renewal needs, owned so the shared future is `'static`
struct Renewal {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
    credentials: CredentialStore,
    terminator: Arc<dyn SessionTerminator>,
    latch: Weak<RenewalLatch>,
}

impl Renewal {
    async fn run(&self) -> RenewalOutcome {
        let outcome = match self.credentials.refresh_token() {
            None => Err(SessionEndReason::MissingRefreshToken),
            Some(refresh_token) => with_timeout(self.timeout, self.refresh(&refresh_token))
                .await
                .unwrap_or(Err(SessionEndReason::TimedOut)),
        };

        match outcome {
            Ok(token) => {
                info!("Access token renewed");
                Ok(token)
            }
            Err(reason) => {
                self.teardown(&reason);
                Err(reason)
            }
        }
    }

    async fn refresh(&self, refresh_token: &str) -> RenewalOutcome {
        let response = self
            .http
            .post(&self.url)
            .header(REFRESH_HEADER, refresh_token)
            .send()
            .await
            .map_err(|e| SessionEndReason::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionEndReason::RefreshRejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SessionEndReason::Transport(e.to_string()))?;
        let tokens: TokenRefreshResponse = serde_json::from_slice(&body)
            .map_err(|e| SessionEndReason::MalformedResponse(e.to_string()))?;

        let access_token = tokens
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SessionEndReason::MalformedResponse("missing accessToken".into()))?;

        if let Err(e) = self.credentials.set_access_token(&access_token) {
            warn!("Failed to persist renewed access token: {e}");
        }
        if let Some(rotated) = tokens.refresh_token.filter(|token| !token.is_empty()) {
            if let Err(e) = self.credentials.set_refresh_token(&rotated) {
                warn!("Failed to persist rotated refresh token: {e}");
            }
        }

        Ok(access_token)
    }

    fn teardown(&self, reason: &SessionEndReason) {
        warn!("Ending session: {reason}");
        if let Err(e) = self.credentials.clear() {
            warn!("Failed to clear credentials: {e}");
        }
        self.terminator.terminate(reason);
    }

    /// Return the latch to idle
    fn release(&self) {
        if let Some(latch) = self.latch.upgrade() {
            *lock(&latch) = None;
        }
    }
}

/// Elapsed marker for [`with_timeout`]
struct Elapsed;

#[cfg(not(target_arch = "wasm32"))]
async fn with_timeout<F: std::future::Future>(limit: Duration, future: F) -> Result<F::Output, Elapsed> {
    tokio::time::timeout(limit, future).await.map_err(|_| Elapsed)
}

#[cfg(target_arch = "wasm32")]
async fn with_timeout<F: std::future::Future>(limit: Duration, future: F) -> Result<F::Output, Elapsed> {
    use futures::future::{Either, select};

    let future = Box::pin(future);
    let sleep = Box::pin(gloo_timers::future::sleep(limit));
    match select(future, sleep).await {
        Either::Left((output, _)) => Ok(output),
        Either::Right(_) => Err(Elapsed),
    }
}

/// Builder for SubsClient
#[derive(Default)]
pub struct SubsClientBuilder {
    config: ClientConfig,
    base_url: Option<String>,
    timeout: Option<Duration>,
    renewal_timeout: Option<Duration>,
    user_agent: Option<String>,
    credentials: Option<CredentialStore>,
    terminator: Option<Arc<dyn SessionTerminator>>,
}

impl SubsClientBuilder {
    /// Start from a loaded configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound a token renewal; queued callers fail once it elapses
    pub fn renewal_timeout(mut self, timeout: Duration) -> Self {
        self.renewal_timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Where tokens are read from and persisted to (in-memory by default)
    pub fn credential_store(mut self, store: CredentialStore) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Hook run once when a session cannot be renewed
    pub fn on_session_end(mut self, terminator: impl SessionTerminator + 'static) -> Self {
        self.terminator = Some(Arc::new(terminator));
        self
    }

    pub fn session_terminator(mut self, terminator: Arc<dyn SessionTerminator>) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SubsClient, ClientError> {
        let mut config = self.config;
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }

        // Ensure base_url ends without a trailing slash
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        if config.base_url.is_empty() {
            return Err(ClientError::Configuration("base_url is required".into()));
        }
        url::Url::parse(&config.base_url).map_err(|e| {
            ClientError::Configuration(format!("invalid base_url {}: {e}", config.base_url))
        })?;

        let renewal_timeout = self
            .renewal_timeout
            .unwrap_or_else(|| config.renewal_timeout());

        let client_builder = ClientBuilder::new().user_agent(config.user_agent.clone());

        #[cfg(not(target_arch = "wasm32"))]
        let client_builder =
            client_builder.timeout(self.timeout.unwrap_or_else(|| config.request_timeout()));

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        let http = client_builder.build()?;

        Ok(SubsClient {
            inner: Arc::new(Inner {
                http,
                config,
                renewal_timeout,
                credentials: self.credentials.unwrap_or_default(),
                terminator: self
                    .terminator
                    .unwrap_or_else(|| Arc::new(LogTermination)),
                renewal: Arc::new(Mutex::new(None)),
            }),
        })
    }
}
