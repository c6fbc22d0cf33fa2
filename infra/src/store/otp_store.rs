//! Redis-backed OTP store
//!
//! Layout per phone number:
//! - `otp:record:{phone}` — the serialized [`OtpRecord`], TTL = code lifetime
//! - `otp:attempts:{phone}` — plain counter driven by `INCR`, same TTL
//!
//! The counter lives outside the record so that concurrent failed attempts
//! increment atomically instead of racing a read-modify-write of the JSON
//! document. `get` merges the counter back into the record it returns.

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use tracing::debug;

use coop_core::domain::entities::otp_record::OtpRecord;
use coop_core::errors::{DomainError, DomainResult};
use coop_core::repositories::OtpStore;
use coop_shared::utils::phone::mask_phone;

use crate::store::redis_client::RedisClient;

const OTP_RECORD_PREFIX: &str = "otp:record";
const OTP_ATTEMPTS_PREFIX: &str = "otp:attempts";

pub struct RedisOtpStore {
    client: RedisClient,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn record_key(phone: &str) -> String {
        format!("{}:{}", OTP_RECORD_PREFIX, phone)
    }

    fn attempts_key(phone: &str) -> String {
        format!("{}:{}", OTP_ATTEMPTS_PREFIX, phone)
    }

    fn remaining_ttl(record: &OtpRecord) -> u64 {
        (record.expires_at - Utc::now()).num_seconds().max(1) as u64
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put(&self, record: &OtpRecord) -> DomainResult<()> {
        let mut conn = self.client.connection();
        let json = serde_json::to_string(record)
            .map_err(|e| DomainError::internal(format!("Failed to serialize OTP record: {}", e)))?;

        let ttl = Self::remaining_ttl(record);
        conn.set_ex::<_, _, ()>(Self::record_key(&record.phone), json, ttl)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to store OTP record: {}", e)))?;

        // Counter follows the record's attempt count; a fresh record resets it
        if record.attempts == 0 {
            conn.del::<_, u32>(Self::attempts_key(&record.phone))
                .await
                .map_err(|e| {
                    DomainError::internal(format!("Failed to reset attempt counter: {}", e))
                })?;
        }

        debug!(phone = %mask_phone(&record.phone), ttl, "stored OTP record");
        Ok(())
    }

    async fn get(&self, phone: &str) -> DomainResult<Option<OtpRecord>> {
        let mut conn = self.client.connection();

        let json: Option<String> = conn
            .get(Self::record_key(phone))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read OTP record: {}", e)))?;

        let Some(json) = json else {
            return Ok(None);
        };

        let mut record: OtpRecord = serde_json::from_str(&json)
            .map_err(|e| DomainError::internal(format!("Corrupt OTP record: {}", e)))?;

        let attempts: Option<u32> = conn
            .get(Self::attempts_key(phone))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read attempt counter: {}", e)))?;
        if let Some(attempts) = attempts {
            record.attempts = attempts;
        }

        Ok(Some(record))
    }

    async fn increment_attempts(&self, phone: &str) -> DomainResult<Option<u32>> {
        let mut conn = self.client.connection();

        // No record, no counter: a counter without a record would outlive it
        let exists: bool = conn
            .exists(Self::record_key(phone))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to check OTP record: {}", e)))?;
        if !exists {
            return Ok(None);
        }

        let attempts: u32 = conn
            .incr(Self::attempts_key(phone), 1)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to increment attempts: {}", e)))?;

        // Counter must never outlive the record it counts for
        let record_ttl: i64 = conn
            .ttl(Self::record_key(phone))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read record TTL: {}", e)))?;
        if record_ttl > 0 {
            conn.expire::<_, bool>(Self::attempts_key(phone), record_ttl)
                .await
                .map_err(|e| {
                    DomainError::internal(format!("Failed to expire attempt counter: {}", e))
                })?;
        }

        Ok(Some(attempts))
    }

    async fn delete(&self, phone: &str) -> DomainResult<()> {
        let mut conn = self.client.connection();

        conn.del::<_, u32>(Self::record_key(phone))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to delete OTP record: {}", e)))?;
        conn.del::<_, u32>(Self::attempts_key(phone))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to delete attempt counter: {}", e)))?;

        debug!(phone = %mask_phone(phone), "deleted OTP record");
        Ok(())
    }
}
