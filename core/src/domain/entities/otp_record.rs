//! One-time passcode record for SMS-based phone verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

use coop_shared::config::otp::CODE_LENGTH;

/// How the code associated with a record reached (or failed to reach) the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Record stored, delivery not yet attempted
    Pending,
    /// Delivered through an SMS provider
    Sms { provider: String },
    /// Every provider failed; the code exists only in storage
    LocalFallback,
}

impl DeliveryMethod {
    /// Short label used in audit entries and log fields
    pub fn label(&self) -> String {
        match self {
            DeliveryMethod::Pending => "pending".to_string(),
            DeliveryMethod::Sms { provider } => format!("sms:{}", provider),
            DeliveryMethod::LocalFallback => "local_fallback".to_string(),
        }
    }
}

/// A pending one-time passcode, keyed by normalized phone number.
///
/// At most one live record exists per phone number: a new request overwrites
/// the previous record. Deletion is the terminal state for every path
/// (verified, expired, or attempt-exhausted) — there is no archive of used
/// codes in the hot store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Normalized phone number this code was issued for (leading `+`)
    pub phone: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was generated
    pub created_at: DateTime<Utc>,

    /// Timestamp at or after which the record is invalid
    pub expires_at: DateTime<Utc>,

    /// Set true exactly once, immediately before deletion
    pub verified: bool,

    /// Count of failed comparison attempts
    pub attempts: u32,

    /// Ceiling on failed attempts before the record is discarded
    pub max_attempts: u32,

    /// Which delivery path produced this record
    #[serde(flatten)]
    pub method: DeliveryMethod,
}

impl OtpRecord {
    /// Creates a new record with a freshly generated code
    ///
    /// # Arguments
    ///
    /// * `phone` - Normalized phone number (leading `+`)
    /// * `ttl_seconds` - Seconds until the code expires
    /// * `max_attempts` - Failed-attempt ceiling
    pub fn new(phone: String, ttl_seconds: i64, max_attempts: u32) -> Self {
        let now = Utc::now();
        Self {
            phone,
            code: Self::generate_code(),
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            verified: false,
            attempts: 0,
            max_attempts,
            method: DeliveryMethod::Pending,
        }
    }

    /// Generates a uniformly random 6-digit code from the OS CSPRNG
    ///
    /// Drawn from [100000, 999999] so the code never carries a leading zero.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(100_000..1_000_000);
        format!("{}", code)
    }

    /// Whether the record is invalid due to expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Whether the failed-attempt ceiling has been reached
    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    /// Remaining failed attempts before exhaustion
    pub fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Constant-time comparison against a submitted code
    ///
    /// Length is checked first; equal-length comparison runs in constant time
    /// to avoid leaking the matching prefix through timing.
    pub fn matches(&self, submitted: &str) -> bool {
        self.code.len() == submitted.len()
            && constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }
}
