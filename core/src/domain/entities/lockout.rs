//! Per-device lockout state for brute-force protection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Independent namespaces for attempt counting.
///
/// A device locked out of OTP verification can still attempt password login
/// and vice versa; the two budgets never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockoutDomain {
    /// Email/password login attempts
    Login,
    /// OTP verification attempts
    Otp,
}

impl LockoutDomain {
    /// Stable identifier used in storage keys and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            LockoutDomain::Login => "login",
            LockoutDomain::Otp => "otp",
        }
    }

    /// Parse a domain from its stable identifier
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "login" => Some(LockoutDomain::Login),
            "otp" => Some(LockoutDomain::Otp),
            _ => None,
        }
    }
}

impl fmt::Display for LockoutDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lockout state for one (domain, device key) pair.
///
/// Created lazily on the first failed attempt. The attempt count resets to 0
/// whenever a lockout expires (detected lazily on the next status check) or
/// the corresponding flow succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// Failed attempts in this domain since the last reset
    pub attempt_count: u32,

    /// When set and in the future, the domain is locked
    pub lockout_until: Option<DateTime<Utc>>,
}

impl LockoutRecord {
    /// Whether a lockout is in force at `now`
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_until, Some(until) if until > now)
    }
}

/// Result of a lockout status query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutStatus {
    /// Whether the domain is currently locked for this device
    pub is_locked_out: bool,

    /// Milliseconds until the lockout lifts (0 when not locked)
    pub remaining_ms: i64,
}

impl LockoutStatus {
    /// Status for an unlocked domain
    pub fn unlocked() -> Self {
        Self {
            is_locked_out: false,
            remaining_ms: 0,
        }
    }

    /// Status for a locked domain with the given time left
    pub fn locked_for_ms(remaining_ms: i64) -> Self {
        Self {
            is_locked_out: true,
            remaining_ms: remaining_ms.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_domain_round_trip() {
        assert_eq!(LockoutDomain::parse("login"), Some(LockoutDomain::Login));
        assert_eq!(LockoutDomain::parse("otp"), Some(LockoutDomain::Otp));
        assert_eq!(LockoutDomain::parse("other"), None);
        assert_eq!(LockoutDomain::Login.as_str(), "login");
    }

    #[test]
    fn test_is_locked_at() {
        let now = Utc::now();

        let unlocked = LockoutRecord {
            attempt_count: 2,
            lockout_until: None,
        };
        assert!(!unlocked.is_locked_at(now));

        let active = LockoutRecord {
            attempt_count: 5,
            lockout_until: Some(now + Duration::seconds(30)),
        };
        assert!(active.is_locked_at(now));

        let expired = LockoutRecord {
            attempt_count: 5,
            lockout_until: Some(now - Duration::seconds(1)),
        };
        assert!(!expired.is_locked_at(now));
    }

    #[test]
    fn test_status_clamps_negative_remaining() {
        let status = LockoutStatus::locked_for_ms(-50);
        assert_eq!(status.remaining_ms, 0);
    }
}
