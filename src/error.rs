use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::envelope::{EnvelopeError, FieldError};

/// Failure taxonomy for backend interactions.
///
/// Network and auth failures inside API calls are normally absorbed into the
/// response envelope; this type exists for the places that need to act on the
/// category - page handlers serving inline errors and the CLI exit path.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Transport failure or an undecodable backend body.
    #[error("{0}")]
    Network(String),

    /// 401-class failure: missing, expired or rejected credential.
    #[error("{0}")]
    Auth(String),

    /// Authenticated but not allowed (role mismatch).
    #[error("{0}")]
    Authorization(String),

    /// Backend-reported field validation failure.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },
}

impl PortalError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Network(_) => StatusCode::BAD_GATEWAY,
            PortalError::Auth(_) => StatusCode::UNAUTHORIZED,
            PortalError::Authorization(_) => StatusCode::FORBIDDEN,
            PortalError::Validation { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PortalError::Network(_) => "NETWORK_ERROR",
            PortalError::Auth(_) => "UNAUTHORIZED",
            PortalError::Authorization(_) => "FORBIDDEN",
            PortalError::Validation { .. } => "VALIDATION_ERROR",
        }
    }
}

impl From<EnvelopeError> for PortalError {
    fn from(err: EnvelopeError) -> Self {
        match err.code.as_str() {
            "UNAUTHORIZED" | "INVALID_CREDENTIALS" | "NO_REFRESH_TOKEN"
            | "INVALID_REFRESH_TOKEN" | "TOKEN_EXPIRED" => PortalError::Auth(err.message),
            "FORBIDDEN" => PortalError::Authorization(err.message),
            "VALIDATION_ERROR" | "INVALID_PASSWORD" | "USER_EXISTS" => PortalError::Validation {
                message: err.message,
                details: err.details.unwrap_or_default(),
            },
            // NETWORK_ERROR and anything unclassified
            _ => PortalError::Network(err.message),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut error = json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });
        if let PortalError::Validation { details, .. } = &self {
            if !details.is_empty() {
                error["details"] = json!(details);
            }
        }
        (status, Json(json!({ "success": false, "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_backend_codes() {
        let auth = PortalError::from(EnvelopeError {
            code: "INVALID_CREDENTIALS".to_string(),
            message: "bad password".to_string(),
            details: None,
        });
        assert!(matches!(auth, PortalError::Auth(_)));
        assert_eq!(auth.status_code(), StatusCode::UNAUTHORIZED);

        let forbidden = PortalError::from(EnvelopeError {
            code: "FORBIDDEN".to_string(),
            message: "Admin access required".to_string(),
            details: None,
        });
        assert!(matches!(forbidden, PortalError::Authorization(_)));

        let unknown = PortalError::from(EnvelopeError {
            code: "SOMETHING_ELSE".to_string(),
            message: "?".to_string(),
            details: None,
        });
        assert!(matches!(unknown, PortalError::Network(_)));
    }

    #[test]
    fn validation_keeps_field_details() {
        let err = PortalError::from(EnvelopeError {
            code: "VALIDATION_ERROR".to_string(),
            message: "Validation failed".to_string(),
            details: Some(vec![FieldError {
                field: "email".to_string(),
                message: "invalid".to_string(),
            }]),
        });
        match err {
            PortalError::Validation { details, .. } => assert_eq!(details.len(), 1),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
