//! OTP record store interface

use async_trait::async_trait;

use crate::domain::entities::otp_record::OtpRecord;
use crate::errors::DomainResult;

/// Persistence interface for [`OtpRecord`]s, keyed by normalized phone number.
///
/// Implementations must make `increment_attempts` atomic (native counter or
/// compare-and-swap): concurrent failed verifications for the same phone must
/// never under-count. The other operations follow last-write-wins semantics,
/// which is acceptable because a new request overwrites the old record by
/// design.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Create or overwrite the record for its phone number
    async fn put(&self, record: &OtpRecord) -> DomainResult<()>;

    /// Fetch the live record for a phone number, if any
    async fn get(&self, phone: &str) -> DomainResult<Option<OtpRecord>>;

    /// Atomically increment the failed-attempt counter.
    ///
    /// Returns the new count, or `None` when no record exists (deleted
    /// concurrently or never created).
    async fn increment_attempts(&self, phone: &str) -> DomainResult<Option<u32>>;

    /// Delete the record for a phone number. Deleting a missing record is
    /// not an error.
    async fn delete(&self, phone: &str) -> DomainResult<()>;
}
