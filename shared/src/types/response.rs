//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard wrapper for successful API responses
///
/// Failures use [`ErrorResponse`] instead, so this never carries error state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always true; lets clients branch on one field for both shapes
    pub success: bool,

    /// Response data
    pub data: T,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Standardized error response structure for domain errors
///
/// `error` carries a machine-readable code ("invalid-argument", "not-found",
/// "deadline-exceeded", "resource-exhausted", "already-exists", "internal")
/// so the mobile client can show one specific message per failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp of when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Create an error response with additional details
    pub fn with_details(mut self, details: HashMap<String, serde_json::Value>) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        let response = ApiResponse::success(42u32);
        assert!(response.success);
        assert_eq!(response.data, 42);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("not-found", "OTP not found or expired");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "not-found");
        assert!(json.get("details").is_none());
    }
}
