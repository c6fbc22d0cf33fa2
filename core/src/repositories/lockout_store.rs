//! Lockout record store interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::lockout::{LockoutDomain, LockoutRecord};
use crate::errors::DomainResult;

/// Persistence interface for lockout state, keyed by (domain, device key).
///
/// `increment_attempts` must be atomic for the same reason as the OTP
/// attempt counter: concurrent failures must not under-count.
#[async_trait]
pub trait LockoutStore: Send + Sync {
    /// Fetch the record for a (domain, key) pair, if any
    async fn get(&self, domain: LockoutDomain, key: &str) -> DomainResult<Option<LockoutRecord>>;

    /// Atomically increment the attempt counter, creating it at 1.
    ///
    /// `counter_ttl_seconds` bounds how long an un-escalated counter lives.
    async fn increment_attempts(
        &self,
        domain: LockoutDomain,
        key: &str,
        counter_ttl_seconds: i64,
    ) -> DomainResult<u32>;

    /// Set the lockout expiry for a (domain, key) pair
    async fn set_lockout_until(
        &self,
        domain: LockoutDomain,
        key: &str,
        until: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// Clear the attempt counter only; an in-force lockout keeps running
    async fn reset_attempts(&self, domain: LockoutDomain, key: &str) -> DomainResult<()>;

    /// Remove all lockout state for a (domain, key) pair
    async fn clear(&self, domain: LockoutDomain, key: &str) -> DomainResult<()>;
}
