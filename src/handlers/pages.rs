use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{redirect_found, GatewayState};
use crate::session::Gate;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Admin Portal Gateway",
            "version": version,
            "pages": {
                "public": "/login, /register",
                "protected": "/dashboard, /dashboard/profile",
                "admin": "/admin, /admin/users, /admin/files, /admin/settings",
            }
        }
    }))
}

/// Liveness, including reachability of the backend the gateway fronts.
pub async fn health(State(state): State<GatewayState>) -> Response {
    let now = chrono::Utc::now();
    let url = format!("{}/health", state.backend_base());

    match state.http().get(&url).send().await {
        Ok(response) if response.status().is_success() => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "backend": "ok" }
            })),
        )
            .into_response(),
        Ok(response) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "backend unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "backend_status": response.status().as_u16()
                }
            })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "backend unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "backend_error": err.to_string()
                }
            })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

/// Public login page. Rendering is client territory; the gateway serves the
/// route so redirects have somewhere to land, passing the query through.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<Value> {
    Json(json!({
        "page": "login",
        "redirect": query.redirect,
        "error": query.error,
    }))
}

pub async fn register_page() -> Json<Value> {
    Json(json!({ "page": "register" }))
}

/// Gate, then hand identity to the page.
pub async fn dashboard_page(
    State(state): State<GatewayState>,
    uri: Uri,
    jar: CookieJar,
) -> Response {
    let cookie = refresh_cookie(&state, &jar);
    match state.guard.require_user(uri.path(), cookie.as_deref()).await {
        Gate::Allow(session) => Json(json!({ "user": session.user })).into_response(),
        Gate::Redirect(location) => redirect_found(&location),
    }
}

pub async fn profile_page(State(state): State<GatewayState>, uri: Uri, jar: CookieJar) -> Response {
    let cookie = refresh_cookie(&state, &jar);
    match state.guard.require_user(uri.path(), cookie.as_deref()).await {
        Gate::Allow(session) => Json(json!({ "user": session.user })).into_response(),
        Gate::Redirect(location) => redirect_found(&location),
    }
}

pub(super) fn refresh_cookie(state: &GatewayState, jar: &CookieJar) -> Option<String> {
    jar.get(state.guard.refresh_cookie_name())
        .map(|cookie| cookie.value().to_string())
}
