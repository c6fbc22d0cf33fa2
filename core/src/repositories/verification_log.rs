//! Append-only verification audit log interface

use async_trait::async_trait;

use crate::domain::entities::verification_log::VerificationLogEntry;
use crate::errors::DomainResult;

/// Append-only sink for verification outcomes.
///
/// The log is observability state, not authoritative state: core logic never
/// reads it back, and callers treat append failures as non-fatal.
#[async_trait]
pub trait VerificationLogRepository: Send + Sync {
    /// Append one outcome entry
    async fn append(&self, entry: &VerificationLogEntry) -> DomainResult<()>;
}
