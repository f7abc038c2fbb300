//! Wire types for the backend JSON contract

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Authenticated user as reported by the backend.
///
/// Opaque to the client beyond display; stored verbatim from the
/// login / current_user responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserIdentity,
}

/// Plain `{message}` acknowledgement used by several endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    pub user: UserIdentity,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// One past request from `/api/history`
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub service_type: String,
    pub timestamp: String,
    #[serde(default)]
    pub result_data: serde_json::Value,
}

/// `/api/health` body.
///
/// The capability flags vary with the deployed models, so anything beyond
/// `status` is kept as a generic name -> bool mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(flatten)]
    pub capabilities: HashMap<String, bool>,
}

impl HealthResponse {
    /// Whether the service itself reports healthy
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Error body shape shared by all endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_flags() {
        let body = r#"{"status":"ok","tts_available":true,"face_detection_available":false}"#;
        let health: HealthResponse = serde_json::from_str(body).unwrap();

        assert!(health.is_ok());
        assert_eq!(health.capabilities.get("tts_available"), Some(&true));
        assert_eq!(
            health.capabilities.get("face_detection_available"),
            Some(&false)
        );
        assert_eq!(health.capabilities.get("unknown"), None);
    }

    #[test]
    fn test_error_response_partial_body() {
        let err: ErrorResponse = serde_json::from_str(r#"{"error":"No text provided"}"#).unwrap();
        assert_eq!(err.error.as_deref(), Some("No text provided"));
        assert!(err.details.is_none());

        let err: ErrorResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(err.error.is_none());
    }

    #[test]
    fn test_history_entry_defaults() {
        let body = r#"{"id":3,"service_type":"tts","timestamp":"2025-05-01T10:00:00Z"}"#;
        let entry: HistoryEntry = serde_json::from_str(body).unwrap();
        assert_eq!(entry.service_type, "tts");
        assert!(entry.result_data.is_null());
    }
}
