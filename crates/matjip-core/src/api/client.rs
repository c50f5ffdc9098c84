//! Request client for the matjip REST backend.
//!
//! `RequestClient` attaches the member id and bearer token from the session
//! store to every request. When the backend answers 401 it runs the shared
//! refresh protocol and replays the request once with the new token. If the
//! refresh fails the session is cleared and `RequestError::AuthExpired` is
//! returned.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::refresh::{RefreshReport, TokenRefresher};
use super::RequestError;
use crate::auth::{Session, SessionStore};
use crate::config::ClientConfig;

/// Identity header carrying the member id, checked by some endpoints
/// independently of the bearer token.
pub const MEMBER_ID_HEADER: &str = "member-id";

const JSON: &str = "application/json";

/// Called once per failed refresh, however many requests were waiting on it.
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// Clone is cheap: clones share the connection pool, the session store and
/// the in-flight refresh.
#[derive(Clone)]
pub struct RequestClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    refresher: Arc<TokenRefresher>,
    on_expired: Option<SessionExpiredHook>,
    /// Newest refresh generation whose failure has already logged the member out.
    expired_generation: Arc<AtomicU64>,
}

impl RequestClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()?;
        let base_url = config.api_base().to_string();
        let refresher = Arc::new(TokenRefresher::new(
            client.clone(),
            &base_url,
            Arc::clone(&store),
        ));

        Ok(Self {
            client,
            base_url,
            store,
            refresher,
            on_expired: None,
            expired_generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Register the forced-logout side effect, e.g. returning to a login view.
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_expired = Some(Arc::new(hook));
        self
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    /// Perform one logical request. A 401 triggers at most one refresh and
    /// one replay.
    ///
    /// Returns `Ok(None)` for 204 or an empty 2xx body, otherwise the parsed
    /// JSON body. Headers in `headers` override the computed defaults.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> Result<Option<Value>, RequestError> {
        let body = encode(body)?;
        self.dispatch(method, path, body, headers.as_ref(), true)
            .await
    }

    /// Like `execute`, but a 401 is an ordinary `ApiError` and never touches
    /// the session. For endpoints that reject bad credentials with 401.
    pub async fn execute_public<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> Result<Option<Value>, RequestError> {
        let body = encode(body)?;
        self.dispatch(method, path, body, headers.as_ref(), false)
            .await
    }

    pub async fn get(&self, path: &str) -> Result<Option<Value>, RequestError> {
        self.execute(path, Method::GET, None::<&()>, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>, RequestError> {
        self.execute(path, Method::POST, Some(body), None).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<Value>, RequestError> {
        self.execute(path, Method::PUT, Some(body), None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Option<Value>, RequestError> {
        self.execute(path, Method::DELETE, None::<&()>, None).await
    }

    /// GET and deserialize the response body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        decode(self.get(path).await?)
    }

    /// Send `body` with `method` and deserialize the response body.
    pub async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError> {
        decode(self.execute(path, method, body, None).await?)
    }

    /// `send_json` without the refresh path.
    pub async fn send_public_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError> {
        decode(self.execute_public(path, method, body, None).await?)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        extra: Option<&HeaderMap>,
        refresh_on_401: bool,
    ) -> Result<Option<Value>, RequestError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, path = path, "Sending request");

        let headers = self.build_headers(&self.store.get(), extra);
        let mut response = self
            .send_once(&method, &url, headers, body.clone())
            .await?;

        if refresh_on_401 && response.status() == StatusCode::UNAUTHORIZED {
            info!(path = path, "Access token rejected, refreshing");
            let report = self.refresher.refresh_tracked().await;
            if !report.outcome.is_refreshed() {
                self.expire_session(&report);
                return Err(RequestError::AuthExpired);
            }

            // Replay once with whatever token the store holds now
            let headers = self.build_headers(&self.store.get(), extra);
            response = self.send_once(&method, &url, headers, body).await?;
        }

        read_body(response).await
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<Response, RequestError> {
        let mut request = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        request.send().await.map_err(|e| {
            warn!(error = %e, url = url, "Request failed to send");
            RequestError::unreachable(e)
        })
    }

    /// JSON content headers, then identity and bearer headers from the
    /// session, then caller headers, which replace any computed value.
    fn build_headers(&self, session: &Session, extra: Option<&HeaderMap>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(header::ACCEPT, HeaderValue::from_static(JSON));

        if let Some(ref member_id) = session.member_id {
            match HeaderValue::from_str(member_id) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(MEMBER_ID_HEADER), value);
                }
                Err(_) => warn!("Stored member id is not a valid header value"),
            }
        }

        if let Some(ref token) = session.access_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored access token is not a valid header value"),
            }
        }

        if let Some(extra) = extra {
            for name in extra.keys() {
                headers.remove(name);
            }
            for (name, value) in extra {
                headers.append(name.clone(), value.clone());
            }
        }

        headers
    }

    /// Only the first waiter on a failed refresh clears the session and fires
    /// the hook; the rest just report `AuthExpired`.
    fn expire_session(&self, report: &RefreshReport) {
        let seen = self
            .expired_generation
            .fetch_max(report.generation, Ordering::SeqCst);
        if seen >= report.generation {
            return;
        }
        warn!(outcome = ?report.outcome, "Token refresh failed, logging out");
        self.store.clear();
        if let Some(ref hook) = self.on_expired {
            hook();
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Vec<u8>>, RequestError> {
    body.map(serde_json::to_vec)
        .transpose()
        .map_err(RequestError::Encode)
}

fn decode<T: DeserializeOwned>(value: Option<Value>) -> Result<T, RequestError> {
    serde_json::from_value(value.unwrap_or(Value::Null)).map_err(RequestError::malformed)
}

async fn read_body(response: Response) -> Result<Option<Value>, RequestError> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let bytes = response.bytes().await.map_err(RequestError::unreachable)?;

    if !status.is_success() {
        debug!(status = %status, "Request returned error status");
        return Err(RequestError::from_status(status, &bytes));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(RequestError::malformed)
}
