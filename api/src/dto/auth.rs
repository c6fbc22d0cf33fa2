//! Auth endpoint DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// POST /api/v1/auth/send-code
#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Phone number; formatting characters are tolerated and stripped
    #[validate(length(min = 2, max = 20, message = "Phone number must be 2-20 characters"))]
    pub phone: String,
}

/// Response body for send-code
#[derive(Debug, Serialize, Deserialize)]
pub struct SendCodeResponse {
    pub phone: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    pub delivered_via_real_sms: bool,

    /// Present only when delivery failed and test-code exposure is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,

    pub instructions: String,

    pub expires_in_seconds: i64,
}

/// POST /api/v1/auth/verify-code
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    #[validate(length(min = 2, max = 20, message = "Phone number must be 2-20 characters"))]
    pub phone: String,

    #[validate(length(equal = 6, message = "Code must be exactly 6 digits"))]
    pub code: String,

    /// Opaque device identifier used as the lockout key
    #[validate(length(min = 1, max = 128, message = "Device id must be 1-128 characters"))]
    pub device_id: String,
}

/// Response body for verify-code
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub phone: String,
    pub verified: bool,
}

/// POST /api/v1/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 128, message = "Device id must be 1-128 characters"))]
    pub device_id: String,
}

/// POST /api/v1/auth/signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Response body for login and signup
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub user_id: String,
    pub email: String,
}

/// GET /api/v1/auth/lockout/{domain}/{key}
#[derive(Debug, Serialize, Deserialize)]
pub struct LockoutStatusResponse {
    pub is_locked_out: bool,

    pub remaining_ms: i64,

    /// Remaining time formatted MM:SS for direct display
    pub remaining_display: String,
}
