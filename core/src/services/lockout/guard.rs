//! Lockout guard: attempt counting and lockout enforcement

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use coop_shared::config::lockout::{FailurePolicy, LockoutConfig};

use crate::domain::entities::lockout::{LockoutDomain, LockoutStatus};
use crate::repositories::LockoutStore;

/// Counts failed attempts per (domain, device key) and enforces a cooling-off
/// window once the limit is hit.
///
/// The guard never fails the caller's flow over its own storage: status checks
/// degrade per the configured [`FailurePolicy`], and recording operations
/// log and swallow storage errors. Lockout state is advisory protection, not
/// authoritative auth state.
pub struct LockoutGuard {
    store: Arc<dyn LockoutStore>,
    config: LockoutConfig,
}

impl LockoutGuard {
    pub fn new(store: Arc<dyn LockoutStore>, config: LockoutConfig) -> Self {
        Self { store, config }
    }

    /// Current lockout status for a (domain, key) pair.
    ///
    /// A lockout whose window has passed is reset lazily here, so the next
    /// failure starts a fresh count rather than re-tripping immediately.
    pub async fn check_lockout(&self, domain: LockoutDomain, key: &str) -> LockoutStatus {
        let record = match self.store.get(domain, key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    domain = %domain,
                    error = %e,
                    "lockout store unreachable during status check"
                );
                return match self.config.failure_policy {
                    FailurePolicy::Open => LockoutStatus::unlocked(),
                    FailurePolicy::Closed => {
                        LockoutStatus::locked_for_ms(self.config.lockout_seconds * 1000)
                    }
                };
            }
        };

        let record = match record {
            Some(record) => record,
            None => return LockoutStatus::unlocked(),
        };

        let now = Utc::now();
        match record.lockout_until {
            Some(until) if until > now => {
                LockoutStatus::locked_for_ms((until - now).num_milliseconds())
            }
            Some(_) => {
                // Window passed: clear the stale state before reporting unlocked
                if let Err(e) = self.store.clear(domain, key).await {
                    warn!(domain = %domain, error = %e, "failed to clear expired lockout");
                }
                LockoutStatus::unlocked()
            }
            None => LockoutStatus::unlocked(),
        }
    }

    /// Record one failed attempt, tripping the lockout at the limit.
    ///
    /// Returns the attempt count after the increment; 0 when the store was
    /// unreachable (the failure is logged, never propagated).
    pub async fn record_failure(&self, domain: LockoutDomain, key: &str) -> u32 {
        let count = match self
            .store
            .increment_attempts(domain, key, self.config.counter_ttl_seconds)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                warn!(domain = %domain, error = %e, "failed to record lockout attempt");
                return 0;
            }
        };

        if count >= self.config.attempt_limit {
            let until = Utc::now() + Duration::seconds(self.config.lockout_seconds);
            match self.store.set_lockout_until(domain, key, until).await {
                Ok(()) => {
                    info!(
                        domain = %domain,
                        attempts = count,
                        lockout_seconds = self.config.lockout_seconds,
                        "attempt limit reached, device locked"
                    );
                }
                Err(e) => {
                    warn!(domain = %domain, error = %e, "failed to set lockout window");
                }
            }
        }

        count
    }

    /// Clear the attempt counter after a successful flow
    pub async fn reset_attempts(&self, domain: LockoutDomain, key: &str) {
        if let Err(e) = self.store.reset_attempts(domain, key).await {
            warn!(domain = %domain, error = %e, "failed to reset lockout attempts");
        }
    }

    /// Remove all lockout state for a (domain, key) pair
    pub async fn clear(&self, domain: LockoutDomain, key: &str) {
        if let Err(e) = self.store.clear(domain, key).await {
            warn!(domain = %domain, error = %e, "failed to clear lockout state");
        }
    }

    /// Attempts left before the lockout trips (for client hints)
    pub async fn remaining_attempts(&self, domain: LockoutDomain, key: &str) -> u32 {
        match self.store.get(domain, key).await {
            Ok(Some(record)) => self.config.attempt_limit.saturating_sub(record.attempt_count),
            Ok(None) => self.config.attempt_limit,
            Err(_) => self.config.attempt_limit,
        }
    }
}

/// Format remaining lockout time as `MM:SS`, rounding partial seconds up
/// so the display never shows 00:00 while still locked.
pub fn format_remaining(remaining_ms: i64) -> String {
    let total_seconds = (remaining_ms.max(0) + 999) / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DomainError, DomainResult};
    use crate::repositories::InMemoryLockoutStore;
    use async_trait::async_trait;
    use chrono::DateTime;

    struct BrokenStore;

    #[async_trait]
    impl LockoutStore for BrokenStore {
        async fn get(
            &self,
            _domain: LockoutDomain,
            _key: &str,
        ) -> DomainResult<Option<crate::domain::entities::lockout::LockoutRecord>> {
            Err(DomainError::internal("store down"))
        }

        async fn increment_attempts(
            &self,
            _domain: LockoutDomain,
            _key: &str,
            _counter_ttl_seconds: i64,
        ) -> DomainResult<u32> {
            Err(DomainError::internal("store down"))
        }

        async fn set_lockout_until(
            &self,
            _domain: LockoutDomain,
            _key: &str,
            _until: DateTime<Utc>,
        ) -> DomainResult<()> {
            Err(DomainError::internal("store down"))
        }

        async fn reset_attempts(&self, _domain: LockoutDomain, _key: &str) -> DomainResult<()> {
            Err(DomainError::internal("store down"))
        }

        async fn clear(&self, _domain: LockoutDomain, _key: &str) -> DomainResult<()> {
            Err(DomainError::internal("store down"))
        }
    }

    fn guard_with(config: LockoutConfig) -> (LockoutGuard, Arc<InMemoryLockoutStore>) {
        let store = Arc::new(InMemoryLockoutStore::new());
        (LockoutGuard::new(store.clone(), config), store)
    }

    #[tokio::test]
    async fn test_unlocked_by_default() {
        let (guard, _) = guard_with(LockoutConfig::default());
        let status = guard.check_lockout(LockoutDomain::Otp, "device-1").await;
        assert!(!status.is_locked_out);
        assert_eq!(status.remaining_ms, 0);
    }

    #[tokio::test]
    async fn test_trips_at_limit() {
        let config = LockoutConfig {
            attempt_limit: 3,
            lockout_seconds: 60,
            ..LockoutConfig::default()
        };
        let (guard, _) = guard_with(config);

        assert_eq!(guard.record_failure(LockoutDomain::Otp, "device-1").await, 1);
        assert_eq!(guard.record_failure(LockoutDomain::Otp, "device-1").await, 2);
        let status = guard.check_lockout(LockoutDomain::Otp, "device-1").await;
        assert!(!status.is_locked_out);

        assert_eq!(guard.record_failure(LockoutDomain::Otp, "device-1").await, 3);
        let status = guard.check_lockout(LockoutDomain::Otp, "device-1").await;
        assert!(status.is_locked_out);
        assert!(status.remaining_ms > 55_000 && status.remaining_ms <= 60_000);
    }

    #[tokio::test]
    async fn test_domains_count_independently() {
        let config = LockoutConfig {
            attempt_limit: 2,
            ..LockoutConfig::default()
        };
        let (guard, _) = guard_with(config);

        guard.record_failure(LockoutDomain::Login, "device-1").await;
        guard.record_failure(LockoutDomain::Login, "device-1").await;

        assert!(
            guard
                .check_lockout(LockoutDomain::Login, "device-1")
                .await
                .is_locked_out
        );
        assert!(
            !guard
                .check_lockout(LockoutDomain::Otp, "device-1")
                .await
                .is_locked_out
        );
    }

    #[tokio::test]
    async fn test_expired_lockout_resets_lazily() {
        let config = LockoutConfig {
            attempt_limit: 1,
            lockout_seconds: 60,
            ..LockoutConfig::default()
        };
        let (guard, store) = guard_with(config);

        guard.record_failure(LockoutDomain::Otp, "device-1").await;

        // Rewind the window into the past
        store
            .set_lockout_until(
                LockoutDomain::Otp,
                "device-1",
                Utc::now() - Duration::seconds(1),
            )
            .await
            .unwrap();

        let status = guard.check_lockout(LockoutDomain::Otp, "device-1").await;
        assert!(!status.is_locked_out);

        // Stale state cleared: the next failure counts from 1
        assert_eq!(guard.record_failure(LockoutDomain::Otp, "device-1").await, 1);
    }

    #[tokio::test]
    async fn test_reset_after_success() {
        let config = LockoutConfig {
            attempt_limit: 3,
            ..LockoutConfig::default()
        };
        let (guard, _) = guard_with(config);

        guard.record_failure(LockoutDomain::Login, "device-1").await;
        guard.record_failure(LockoutDomain::Login, "device-1").await;
        guard.reset_attempts(LockoutDomain::Login, "device-1").await;

        assert_eq!(
            guard.record_failure(LockoutDomain::Login, "device-1").await,
            1
        );
    }

    #[tokio::test]
    async fn test_fail_open_on_store_error() {
        let guard = LockoutGuard::new(Arc::new(BrokenStore), LockoutConfig::default());

        let status = guard.check_lockout(LockoutDomain::Otp, "device-1").await;
        assert!(!status.is_locked_out);
        assert_eq!(guard.record_failure(LockoutDomain::Otp, "device-1").await, 0);
    }

    #[tokio::test]
    async fn test_fail_closed_on_store_error() {
        let config = LockoutConfig {
            failure_policy: FailurePolicy::Closed,
            ..LockoutConfig::default()
        };
        let guard = LockoutGuard::new(Arc::new(BrokenStore), config);

        let status = guard.check_lockout(LockoutDomain::Otp, "device-1").await;
        assert!(status.is_locked_out);
        assert!(status.remaining_ms > 0);
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(1), "00:01"); // partial second rounds up
        assert_eq!(format_remaining(59_000), "00:59");
        assert_eq!(format_remaining(60_000), "01:00");
        assert_eq!(format_remaining(3_600_000), "60:00");
        assert_eq!(format_remaining(-5), "00:00");
    }
}
