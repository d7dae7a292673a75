pub mod admin;
pub mod pages;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::PortalError;
use crate::session::{SessionGuard, SessionUser};

/// Shared gateway state, passed to handlers by axum `State`.
///
/// Built from config at startup, or pointed at a mock backend in tests.
#[derive(Clone)]
pub struct GatewayState {
    pub guard: Arc<SessionGuard>,
    backend_base: String,
    backend_timeout: Duration,
    http: reqwest::Client,
}

impl GatewayState {
    pub fn new(
        backend_base: impl Into<String>,
        refresh_cookie: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let backend_base = backend_base.into().trim_end_matches('/').to_string();
        let guard = SessionGuard::new(&backend_base, refresh_cookie, timeout)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            guard: Arc::new(guard),
            backend_base,
            backend_timeout: timeout,
            http,
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.backend.base_url,
            &config.session.refresh_cookie,
            Duration::from_secs(config.backend.timeout_secs),
        )
    }

    pub fn backend_base(&self) -> &str {
        &self.backend_base
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Per-request backend client carrying the access token the gate minted
    /// for this visitor, for server-side page data fetches.
    pub(crate) fn page_client(&self, session: &SessionUser) -> Result<ApiClient, PortalError> {
        let client = ApiClient::with_timeout(&self.backend_base, self.backend_timeout)
            .map_err(|err| PortalError::Network(err.to_string()))?;
        client.set_access_token(Some(session.access_token.clone()));
        Ok(client)
    }
}

/// Assemble the gateway router.
pub fn app(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(pages::root))
        .route("/health", get(pages::health))
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
        .route("/dashboard", get(pages::dashboard_page))
        .route("/dashboard/profile", get(pages::profile_page))
        .merge(admin_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<GatewayState> {
    Router::new()
        .route("/admin", get(admin::dashboard_page))
        .route("/admin/users", get(admin::users_page))
        .route("/admin/files", get(admin::files_page))
        .route("/admin/settings", get(admin::settings_page))
}

/// Plain HTTP 302 with a Location header. The session gate contract is a
/// 302, which axum's `Redirect` helpers do not emit.
pub(crate) fn redirect_found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}
