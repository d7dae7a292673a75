use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// Wire code used for synthesized transport/decode failures.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Uniform envelope every backend endpoint replies with.
///
/// Mirrors the backend contract: `success` is always present, `data` only on
/// success, `error` only on failure. Field names are camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<EnvelopeMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Backend-reported per-field validation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMeta {
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    /// Build a failed envelope with the given wire code and message.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(EnvelopeError {
                code: code.into(),
                message: message.into(),
                details: None,
            }),
            meta: None,
        }
    }

    /// Synthesized envelope for transport failures and undecodable bodies.
    ///
    /// The request wrapper never raises; everything the network layer can do
    /// wrong collapses into this envelope.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::failure(NETWORK_ERROR, message)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    /// Unwrap the envelope into the carried payload or a classified error.
    ///
    /// Only meaningful for endpoints that return data on success.
    pub fn into_result(self) -> Result<T, PortalError> {
        if self.success {
            self.data
                .ok_or_else(|| PortalError::Network("response envelope missing data".to_string()))
        } else {
            Err(self
                .error
                .map(PortalError::from)
                .unwrap_or_else(|| PortalError::Network("unspecified backend error".to_string())))
        }
    }
}
