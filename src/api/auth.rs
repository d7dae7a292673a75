use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::client::ApiClient;
use crate::api::envelope::ResponseEnvelope;

/// Identity as reported by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub created_at: String,
}

/// Token grant from login, register and refresh responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub expires_in: i64,
}

/// Login/register payload: a token grant plus the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
}

/// POST /auth/login. Stores the granted access token on success.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> ResponseEnvelope<AuthSession> {
    let body = json!({ "email": email, "password": password });
    let response: ResponseEnvelope<AuthSession> = client.post("/auth/login", Some(body)).await;
    if response.success {
        if let Some(session) = &response.data {
            client.set_access_token(Some(session.access_token.clone()));
        }
    }
    response
}

/// POST /auth/register. Stores the granted access token on success.
pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> ResponseEnvelope<AuthSession> {
    let mut body = json!({ "email": email, "password": password });
    if let Some(name) = name {
        body["name"] = json!(name);
    }
    let response: ResponseEnvelope<AuthSession> = client.post("/auth/register", Some(body)).await;
    if response.success {
        if let Some(session) = &response.data {
            client.set_access_token(Some(session.access_token.clone()));
        }
    }
    response
}

/// POST /auth/logout. The local access token is cleared no matter what the
/// backend says - a failed or timed-out logout still ends the local session.
pub async fn logout(client: &ApiClient) -> ResponseEnvelope<Value> {
    let response = client.post("/auth/logout", None).await;
    client.set_access_token(None);
    response
}

/// POST /auth/refresh, via the shared refresh coordinator.
pub async fn refresh(client: &ApiClient) -> bool {
    client.refresh_access_token().await
}

/// GET /auth/me.
pub async fn me(client: &ApiClient) -> ResponseEnvelope<User> {
    client.get("/auth/me").await
}
