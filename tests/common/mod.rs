#![allow(dead_code)]

use serde_json::json;

use admin_portal::api::ApiClient;

pub const JSON_CT: (&str, &str) = ("content-type", "application/json");

/// Client pointed at a mockito backend.
pub fn client_for(server: &mockito::ServerGuard) -> ApiClient {
    ApiClient::new(server.url()).expect("client construction")
}

/// Envelope body for refresh/token-grant responses.
pub fn tokens_body(access_token: &str) -> String {
    json!({
        "success": true,
        "data": { "accessToken": access_token, "expiresIn": 900 }
    })
    .to_string()
}

/// Envelope body for login/register responses.
pub fn session_body(access_token: &str, email: &str) -> String {
    json!({
        "success": true,
        "data": {
            "accessToken": access_token,
            "expiresIn": 900,
            "user": {
                "id": "u-1",
                "email": email,
                "name": "Test User",
                "role": "user",
                "createdAt": "2024-01-01T00:00:00Z"
            }
        }
    })
    .to_string()
}

/// Envelope body for /auth/me.
pub fn user_body(email: &str, role: &str) -> String {
    json!({
        "success": true,
        "data": {
            "id": "u-1",
            "email": email,
            "name": "Test User",
            "role": role,
            "createdAt": "2024-01-01T00:00:00Z"
        }
    })
    .to_string()
}

/// Failed envelope with the given wire code.
pub fn error_body(code: &str, message: &str) -> String {
    json!({
        "success": false,
        "error": { "code": code, "message": message }
    })
    .to_string()
}
