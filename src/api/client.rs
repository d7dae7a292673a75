use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::auth::AuthTokens;
use crate::api::envelope::ResponseEnvelope;

/// Refresh endpoint path. Calls to this path never trigger refresh-and-retry
/// on themselves.
pub const REFRESH_PATH: &str = "/auth/refresh";

type RefreshFuture = Shared<BoxFuture<'static, bool>>;

/// Client for the backend REST API.
///
/// Owns the current access token and the single in-flight refresh slot.
/// The refresh credential lives in the reqwest cookie store and is presented
/// by the transport; application code never reads it. Clones are cheap and
/// share all state.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    access_token: RwLock<Option<String>>,
    refresh_slot: Mutex<Option<RefreshFuture>>,
}

/// Outcome of a single wire exchange, before the retry policy is applied.
enum Exchange<T> {
    /// Got a decodable envelope back, with its HTTP status.
    Decoded(StatusCode, ResponseEnvelope<T>),
    /// Transport or decode failure, already collapsed into an envelope.
    Failed(ResponseEnvelope<T>),
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                access_token: RwLock::new(None),
                refresh_slot: Mutex::new(None),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Replace the held access token wholesale. `None` clears it.
    pub fn set_access_token(&self, token: Option<String>) {
        let mut slot = write_lock(&self.inner.access_token);
        *slot = token;
    }

    pub fn access_token(&self) -> Option<String> {
        read_lock(&self.inner.access_token).clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ResponseEnvelope<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> ResponseEnvelope<T> {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> ResponseEnvelope<T> {
        self.request(Method::PUT, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ResponseEnvelope<T> {
        self.request(Method::DELETE, path, None).await
    }

    /// Issue one call with the retry-on-401 policy applied.
    ///
    /// A 401 on anything but the refresh endpoint triggers one refresh; if
    /// that succeeds the call is reissued exactly once. A second 401 comes
    /// back unchanged.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ResponseEnvelope<T> {
        let mut retried = false;
        loop {
            match self.exchange(method.clone(), path, body.as_ref()).await {
                Exchange::Decoded(status, envelope) => {
                    if status == StatusCode::UNAUTHORIZED && path != REFRESH_PATH && !retried {
                        debug!(path, "401 from backend, attempting token refresh");
                        if self.refresh_access_token().await {
                            retried = true;
                            continue;
                        }
                    }
                    return envelope;
                }
                Exchange::Failed(envelope) => return envelope,
            }
        }
    }

    /// Exchange the cookie-held refresh credential for a new access token.
    ///
    /// Concurrent callers attach to the same in-flight refresh; exactly one
    /// backend call is made and all callers observe its outcome. On success
    /// the new token is stored; on any failure the token store is cleared.
    /// Errors are absorbed into the returned boolean.
    // Returns the shared future directly (rather than being an `async fn`)
    // so the future `request` awaits here is a concrete type-erased type,
    // which breaks the `request` -> refresh -> `request` cycle in auto-trait
    // (Send) inference.
    pub fn refresh_access_token(&self) -> RefreshFuture {
        let mut slot = lock(&self.inner.refresh_slot);
        match slot.as_ref() {
            Some(in_flight) => in_flight.clone(),
            None => {
                let inner = Arc::clone(&self.inner);
                let fut = async move {
                    let ok = do_refresh(&inner).await;
                    // The slot is cleared exactly once, here, after the
                    // outcome has settled. A caller that grabbed the
                    // shared handle earlier still sees the same result.
                    *lock(&inner.refresh_slot) = None;
                    ok
                }
                .boxed()
                .shared();
                *slot = Some(fut.clone());
                fut
            }
        }
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Exchange<T> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.http.request(method, &url);
        if let Some(token) = self.access_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(path, error = %err, "backend request failed");
                return Exchange::Failed(ResponseEnvelope::network_error(err.to_string()));
            }
        };

        let status = response.status();
        match response.json::<ResponseEnvelope<T>>().await {
            Ok(envelope) => Exchange::Decoded(status, envelope),
            Err(err) => {
                warn!(path, %status, error = %err, "undecodable backend response");
                Exchange::Failed(ResponseEnvelope::network_error(format!(
                    "invalid response body: {err}"
                )))
            }
        }
    }
}

async fn do_refresh(inner: &Arc<ClientInner>) -> bool {
    let client = ApiClient {
        inner: Arc::clone(inner),
    };
    let envelope: ResponseEnvelope<AuthTokens> = client.post(REFRESH_PATH, None).await;
    if envelope.success {
        if let Some(tokens) = envelope.data {
            client.set_access_token(Some(tokens.access_token));
            debug!("access token refreshed");
            return true;
        }
    }
    warn!(
        code = envelope.error_code().unwrap_or("unknown"),
        "token refresh failed, clearing access token"
    );
    client.set_access_token(None);
    false
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn read_lock<'a, T>(lock: &'a RwLock<T>) -> std::sync::RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<'a, T>(lock: &'a RwLock<T>) -> std::sync::RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
