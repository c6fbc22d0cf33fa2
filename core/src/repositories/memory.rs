//! In-memory repository implementations
//!
//! Backed by `tokio::sync::Mutex<HashMap>`, so counter increments are atomic
//! under the lock. Used by the test suites and local development; production
//! deployments use the Redis-backed stores in the infrastructure crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::entities::lockout::{LockoutDomain, LockoutRecord};
use crate::domain::entities::otp_record::OtpRecord;
use crate::domain::entities::verification_log::VerificationLogEntry;
use crate::errors::DomainResult;
use crate::repositories::lockout_store::LockoutStore;
use crate::repositories::otp_store::OtpStore;
use crate::repositories::verification_log::VerificationLogRepository;

/// In-memory [`OtpStore`], keyed by normalized phone number
#[derive(Debug, Clone, Default)]
pub struct InMemoryOtpStore {
    records: Arc<Mutex<HashMap<String, OtpRecord>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn put(&self, record: &OtpRecord) -> DomainResult<()> {
        let mut records = self.records.lock().await;
        records.insert(record.phone.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, phone: &str) -> DomainResult<Option<OtpRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(phone).cloned())
    }

    async fn increment_attempts(&self, phone: &str) -> DomainResult<Option<u32>> {
        let mut records = self.records.lock().await;
        match records.get_mut(phone) {
            Some(record) => {
                record.attempts += 1;
                Ok(Some(record.attempts))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, phone: &str) -> DomainResult<()> {
        let mut records = self.records.lock().await;
        records.remove(phone);
        Ok(())
    }
}

/// In-memory [`LockoutStore`], keyed by (domain, device key)
#[derive(Debug, Clone, Default)]
pub struct InMemoryLockoutStore {
    records: Arc<Mutex<HashMap<(LockoutDomain, String), LockoutRecord>>>,
}

impl InMemoryLockoutStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LockoutStore for InMemoryLockoutStore {
    async fn get(&self, domain: LockoutDomain, key: &str) -> DomainResult<Option<LockoutRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(&(domain, key.to_string())).cloned())
    }

    async fn increment_attempts(
        &self,
        domain: LockoutDomain,
        key: &str,
        _counter_ttl_seconds: i64,
    ) -> DomainResult<u32> {
        let mut records = self.records.lock().await;
        let record = records
            .entry((domain, key.to_string()))
            .or_insert_with(LockoutRecord::default);
        record.attempt_count += 1;
        Ok(record.attempt_count)
    }

    async fn set_lockout_until(
        &self,
        domain: LockoutDomain,
        key: &str,
        until: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut records = self.records.lock().await;
        let record = records
            .entry((domain, key.to_string()))
            .or_insert_with(LockoutRecord::default);
        record.lockout_until = Some(until);
        Ok(())
    }

    async fn reset_attempts(&self, domain: LockoutDomain, key: &str) -> DomainResult<()> {
        let mut records = self.records.lock().await;
        if let Some(record) = records.get_mut(&(domain, key.to_string())) {
            record.attempt_count = 0;
        }
        Ok(())
    }

    async fn clear(&self, domain: LockoutDomain, key: &str) -> DomainResult<()> {
        let mut records = self.records.lock().await;
        records.remove(&(domain, key.to_string()));
        Ok(())
    }
}

/// In-memory [`VerificationLogRepository`] that retains entries for assertions
#[derive(Debug, Clone, Default)]
pub struct InMemoryVerificationLog {
    entries: Arc<Mutex<Vec<VerificationLogEntry>>>,
}

impl InMemoryVerificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all appended entries, oldest first
    pub async fn entries(&self) -> Vec<VerificationLogEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl VerificationLogRepository for InMemoryVerificationLog {
    async fn append(&self, entry: &VerificationLogEntry) -> DomainResult<()> {
        let mut entries = self.entries.lock().await;
        entries.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_otp_store_put_get_delete() {
        let store = InMemoryOtpStore::new();
        let record = OtpRecord::new("+8613800138000".to_string(), 300, 5);

        store.put(&record).await.unwrap();
        let fetched = store.get("+8613800138000").await.unwrap().unwrap();
        assert_eq!(fetched.code, record.code);

        store.delete("+8613800138000").await.unwrap();
        assert!(store.get("+8613800138000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_otp_store_increment_is_sequential() {
        let store = InMemoryOtpStore::new();
        let record = OtpRecord::new("+8613800138000".to_string(), 300, 5);
        store.put(&record).await.unwrap();

        assert_eq!(
            store.increment_attempts("+8613800138000").await.unwrap(),
            Some(1)
        );
        assert_eq!(
            store.increment_attempts("+8613800138000").await.unwrap(),
            Some(2)
        );
        assert_eq!(store.increment_attempts("+15550000000").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lockout_store_increment_and_reset() {
        let store = InMemoryLockoutStore::new();

        assert_eq!(
            store
                .increment_attempts(LockoutDomain::Login, "device-1", 3600)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .increment_attempts(LockoutDomain::Login, "device-1", 3600)
                .await
                .unwrap(),
            2
        );
        // Different domain counts independently
        assert_eq!(
            store
                .increment_attempts(LockoutDomain::Otp, "device-1", 3600)
                .await
                .unwrap(),
            1
        );

        store
            .reset_attempts(LockoutDomain::Login, "device-1")
            .await
            .unwrap();
        let record = store
            .get(LockoutDomain::Login, "device-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.attempt_count, 0);
    }

    #[tokio::test]
    async fn test_lockout_store_set_until_and_clear() {
        let store = InMemoryLockoutStore::new();
        let until = Utc::now() + Duration::hours(1);

        store
            .set_lockout_until(LockoutDomain::Otp, "device-2", until)
            .await
            .unwrap();
        let record = store
            .get(LockoutDomain::Otp, "device-2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.lockout_until, Some(until));

        store.clear(LockoutDomain::Otp, "device-2").await.unwrap();
        assert!(store
            .get(LockoutDomain::Otp, "device-2")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_verification_log_retains_entries() {
        let log = InMemoryVerificationLog::new();
        let entry = VerificationLogEntry::success("+8613800138000", "sms", 1);
        log.append(&entry).await.unwrap();

        let entries = log.entries().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
    }
}
