//! Append-only audit entries for verification outcomes.
//!
//! Entries are written for observability and never read back by core logic;
//! the hot OTP store stays authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One verification outcome, success or failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationLogEntry {
    /// Unique entry identifier
    pub id: Uuid,

    /// Normalized phone number the attempt was made against
    pub phone: String,

    /// When the outcome was recorded
    pub timestamp: DateTime<Utc>,

    /// Whether verification succeeded
    pub success: bool,

    /// Delivery/verification path ("sms:TextBelt", "local_fallback", ...)
    pub method: String,

    /// Attempt count on the record at the time of the outcome
    pub attempts: u32,

    /// Failure kind for unsuccessful outcomes ("invalid_code", "expired", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationLogEntry {
    /// Entry for a successful verification
    pub fn success(phone: &str, method: &str, attempts: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: phone.to_string(),
            timestamp: Utc::now(),
            success: true,
            method: method.to_string(),
            attempts,
            error: None,
        }
    }

    /// Entry for a failed verification
    pub fn failure(phone: &str, method: &str, attempts: u32, error: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: phone.to_string(),
            timestamp: Utc::now(),
            success: false,
            method: method.to_string(),
            attempts,
            error: Some(error.to_string()),
        }
    }
}
