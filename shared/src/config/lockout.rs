//! Device lockout policy configuration

use serde::{Deserialize, Serialize};

/// Default failed-attempt ceiling per lockout domain
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 5;

/// Default lockout window in seconds (1 hour).
///
/// Test builds override this with a few seconds via `COOP_LOCKOUT_SECONDS`.
pub const DEFAULT_LOCKOUT_SECONDS: i64 = 3600;

/// Behavior when the lockout store itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Treat storage errors as "not locked out" (permissive)
    Open,
    /// Treat storage errors as "locked out" (restrictive)
    Closed,
}

/// Policy configuration for the device lockout guard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutConfig {
    /// Failed attempts before a domain locks
    pub attempt_limit: u32,

    /// How long a lockout lasts, in seconds
    pub lockout_seconds: i64,

    /// TTL for the attempt counter itself, in seconds. A counter that is
    /// never pushed over the limit ages out on its own.
    pub counter_ttl_seconds: i64,

    /// What to report when the backing store is unreachable
    pub failure_policy: FailurePolicy,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            attempt_limit: DEFAULT_ATTEMPT_LIMIT,
            lockout_seconds: DEFAULT_LOCKOUT_SECONDS,
            counter_ttl_seconds: DEFAULT_LOCKOUT_SECONDS,
            failure_policy: FailurePolicy::Open,
        }
    }
}

impl LockoutConfig {
    /// Load from environment variables, falling back to defaults
    ///
    /// * `COOP_LOCKOUT_ATTEMPT_LIMIT`
    /// * `COOP_LOCKOUT_SECONDS`
    /// * `COOP_LOCKOUT_FAIL_CLOSED` ("true"/"1" for fail-closed)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let lockout_seconds = std::env::var("COOP_LOCKOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.lockout_seconds);
        Self {
            attempt_limit: std::env::var("COOP_LOCKOUT_ATTEMPT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.attempt_limit),
            lockout_seconds,
            counter_ttl_seconds: lockout_seconds,
            failure_policy: if std::env::var("COOP_LOCKOUT_FAIL_CLOSED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
            {
                FailurePolicy::Closed
            } else {
                FailurePolicy::Open
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_fail_open() {
        let config = LockoutConfig::default();
        assert_eq!(config.attempt_limit, 5);
        assert_eq!(config.lockout_seconds, 3600);
        assert_eq!(config.failure_policy, FailurePolicy::Open);
    }
}
