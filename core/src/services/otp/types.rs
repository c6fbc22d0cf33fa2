//! Result types returned by the OTP service

use serde::{Deserialize, Serialize};

use crate::domain::entities::otp_record::DeliveryMethod;

/// Outcome of a send-code request.
///
/// `test_code` is populated only when SMS delivery failed AND the service is
/// configured to expose codes (development/staging). Production deployments
/// keep the flag off and the field stays `None` on every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOtpResult {
    /// Normalized phone number the code was issued for
    pub phone: String,

    /// Provider that accepted the message, when one did
    pub provider: Option<String>,

    /// True when a provider accepted the message, false on local fallback
    pub delivered_via_real_sms: bool,

    /// The code itself, exposed only under the local-fallback + flag path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,

    /// Human-readable guidance for the caller
    pub instructions: String,

    /// Provider-side message identifier, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Seconds until the issued code expires
    pub expires_in_seconds: i64,
}

/// Outcome of a successful verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOtpResult {
    /// Normalized phone number that was verified
    pub phone: String,

    /// How the verified code had been delivered
    pub method: DeliveryMethod,
}
