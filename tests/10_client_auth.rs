//! Backend client behavior: token refresh coordination, the retry-on-401
//! policy, and envelope synthesis for transport failures.

mod common;

use std::time::Duration;

use futures::future::join_all;
use mockito::Matcher;
use serde_json::{json, Value};

use admin_portal::api::envelope::NETWORK_ERROR;
use admin_portal::api::{auth, ApiClient, ResponseEnvelope};

#[tokio::test]
async fn concurrent_refreshes_share_one_backend_call() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::tokens_body("fresh-token"))
        .expect(1)
        .create_async()
        .await;

    let client = common::client_for(&server);
    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            async move { client.refresh_access_token().await }
        })
        .collect();
    let outcomes = join_all(attempts).await;

    assert!(outcomes.into_iter().all(|ok| ok));
    assert_eq!(client.access_token().as_deref(), Some("fresh-token"));
    refresh.assert_async().await;
}

#[tokio::test]
async fn refresh_slot_is_reusable_after_settling() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::tokens_body("fresh-token"))
        .expect(2)
        .create_async()
        .await;

    let client = common::client_for(&server);
    assert!(client.refresh_access_token().await);
    assert!(client.refresh_access_token().await);
    refresh.assert_async().await;
}

#[tokio::test]
async fn failed_refresh_clears_the_access_token() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body(
            "INVALID_REFRESH_TOKEN",
            "Refresh token is invalid",
        ))
        .create_async()
        .await;

    let client = common::client_for(&server);
    client.set_access_token(Some("stale".to_string()));

    assert!(!client.refresh_access_token().await);
    assert_eq!(client.access_token(), None);
}

#[tokio::test]
async fn a_401_is_refreshed_and_retried_exactly_once() {
    let mut server = mockito::Server::new_async().await;
    let unauthorized = server
        .mock("GET", "/auth/me")
        .match_header("authorization", Matcher::Missing)
        .with_status(401)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body("UNAUTHORIZED", "Missing access token"))
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::tokens_body("fresh-token"))
        .expect(1)
        .create_async()
        .await;
    let authorized = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer fresh-token")
        .with_status(200)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::user_body("admin@example.com", "admin"))
        .expect(1)
        .create_async()
        .await;

    let client = common::client_for(&server);
    let envelope = auth::me(&client).await;

    assert!(envelope.success);
    assert_eq!(
        envelope.data.map(|user| user.email).as_deref(),
        Some("admin@example.com")
    );
    unauthorized.assert_async().await;
    refresh.assert_async().await;
    authorized.assert_async().await;
}

#[tokio::test]
async fn a_second_401_is_returned_without_another_retry() {
    let mut server = mockito::Server::new_async().await;
    // Refresh hands back the same token, so the retried call fails again.
    let unauthorized = server
        .mock("GET", "/auth/me")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body("UNAUTHORIZED", "Token expired"))
        .expect(2)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(200)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::tokens_body("stale"))
        .expect(1)
        .create_async()
        .await;

    let client = common::client_for(&server);
    client.set_access_token(Some("stale".to_string()));
    let envelope = auth::me(&client).await;

    assert!(!envelope.success);
    assert_eq!(envelope.error_code(), Some("UNAUTHORIZED"));
    unauthorized.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn the_refresh_endpoint_never_retries_itself() {
    let mut server = mockito::Server::new_async().await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body("NO_REFRESH_TOKEN", "No refresh token"))
        .expect(1)
        .create_async()
        .await;

    let client = common::client_for(&server);
    let envelope: ResponseEnvelope<Value> = client.post("/auth/refresh", None).await;

    assert!(!envelope.success);
    assert_eq!(envelope.error_code(), Some("NO_REFRESH_TOKEN"));
    refresh.assert_async().await;
}

#[tokio::test]
async fn transport_failure_collapses_into_a_network_error_envelope() {
    // Nothing listens on the discard port.
    let client = ApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2))
        .expect("client construction");
    let envelope: ResponseEnvelope<Value> = client.get("/auth/me").await;

    assert!(!envelope.success);
    assert_eq!(envelope.error_code(), Some(NETWORK_ERROR));
}

#[tokio::test]
async fn undecodable_body_collapses_into_a_network_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/me")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>gateway timeout</html>")
        .create_async()
        .await;

    let client = common::client_for(&server);
    let envelope: ResponseEnvelope<Value> = client.get("/auth/me").await;

    assert!(!envelope.success);
    assert_eq!(envelope.error_code(), Some(NETWORK_ERROR));
}

#[tokio::test]
async fn undecodable_401_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let unauthorized = server
        .mock("GET", "/auth/me")
        .with_status(401)
        .with_header("content-type", "text/plain")
        .with_body("unauthorized")
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh")
        .expect(0)
        .create_async()
        .await;

    let client = common::client_for(&server);
    let envelope: ResponseEnvelope<Value> = client.get("/auth/me").await;

    assert_eq!(envelope.error_code(), Some(NETWORK_ERROR));
    unauthorized.assert_async().await;
    refresh.assert_async().await;
}

#[tokio::test]
async fn login_stores_the_granted_access_token() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({
            "email": "admin@example.com",
            "password": "hunter2",
        })))
        .with_status(200)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::session_body("granted", "admin@example.com"))
        .create_async()
        .await;

    let client = common::client_for(&server);
    let envelope = auth::login(&client, "admin@example.com", "hunter2").await;

    assert!(envelope.success);
    assert_eq!(client.access_token().as_deref(), Some("granted"));
    login.assert_async().await;
}

#[tokio::test]
async fn failed_login_stores_nothing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body(
            "INVALID_CREDENTIALS",
            "Invalid email or password",
        ))
        .create_async()
        .await;

    let client = common::client_for(&server);
    // 401 from login triggers a refresh attempt; reject that too.
    server
        .mock("POST", "/auth/refresh")
        .with_status(401)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body("NO_REFRESH_TOKEN", "No refresh token"))
        .create_async()
        .await;

    let envelope = auth::login(&client, "admin@example.com", "wrong").await;

    assert!(!envelope.success);
    assert_eq!(envelope.error_code(), Some("INVALID_CREDENTIALS"));
    assert_eq!(client.access_token(), None);
}

#[tokio::test]
async fn logout_clears_the_token_even_when_the_backend_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/logout")
        .with_status(500)
        .with_header(common::JSON_CT.0, common::JSON_CT.1)
        .with_body(common::error_body("INTERNAL_ERROR", "Session store down"))
        .create_async()
        .await;

    let client = common::client_for(&server);
    client.set_access_token(Some("granted".to_string()));
    let envelope = auth::logout(&client).await;

    assert!(!envelope.success);
    assert_eq!(client.access_token(), None);
}
