//! OTP policy configuration

use serde::{Deserialize, Serialize};

/// Length of a verification code in digits
pub const CODE_LENGTH: usize = 6;

/// Default time-to-live for a verification code (5 minutes)
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// Default ceiling on failed verification attempts per code
///
/// Matches the per-device lockout limit so one code can never outlive the
/// device-level budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Policy configuration for the OTP lifecycle manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Seconds before a freshly issued code expires
    pub ttl_seconds: i64,

    /// Maximum failed verification attempts before the code is discarded
    pub max_attempts: u32,

    /// Include the generated code in the request response.
    ///
    /// Debug/test builds only. In production this must stay `false`; the code
    /// reaches the user through SMS, never through the API response.
    pub expose_test_code: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            expose_test_code: false,
        }
    }
}

impl OtpConfig {
    /// Load from environment variables, falling back to defaults
    ///
    /// * `COOP_OTP_TTL_SECONDS`
    /// * `COOP_OTP_MAX_ATTEMPTS`
    /// * `COOP_EXPOSE_TEST_CODE` ("true"/"1" to enable)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_seconds: std::env::var("COOP_OTP_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_seconds),
            max_attempts: std::env::var("COOP_OTP_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_attempts),
            expose_test_code: std::env::var("COOP_EXPOSE_TEST_CODE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}
