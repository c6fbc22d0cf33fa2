//! Redis-backed verification audit log
//!
//! Entries land on a single capped list (`otp:audit:log`) via `LPUSH`, newest
//! first. `LTRIM` bounds the list so the log cannot grow without limit.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use coop_core::domain::entities::verification_log::VerificationLogEntry;
use coop_core::errors::{DomainError, DomainResult};
use coop_core::repositories::VerificationLogRepository;
use coop_shared::utils::phone::mask_phone;

use crate::store::redis_client::RedisClient;

const AUDIT_LOG_KEY: &str = "otp:audit:log";
const MAX_ENTRIES: isize = 10_000;

pub struct RedisVerificationLog {
    client: RedisClient,
}

impl RedisVerificationLog {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Most recent entries, newest first
    pub async fn recent(&self, count: isize) -> DomainResult<Vec<VerificationLogEntry>> {
        let mut conn = self.client.connection();

        let raw: Vec<String> = conn
            .lrange(AUDIT_LOG_KEY, 0, count - 1)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read audit log: {}", e)))?;

        raw.iter()
            .map(|json| {
                serde_json::from_str(json)
                    .map_err(|e| DomainError::internal(format!("Corrupt audit entry: {}", e)))
            })
            .collect()
    }
}

#[async_trait]
impl VerificationLogRepository for RedisVerificationLog {
    async fn append(&self, entry: &VerificationLogEntry) -> DomainResult<()> {
        let mut conn = self.client.connection();

        let json = serde_json::to_string(entry).map_err(|e| {
            DomainError::internal(format!("Failed to serialize audit entry: {}", e))
        })?;

        conn.lpush::<_, _, ()>(AUDIT_LOG_KEY, json)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to append audit entry: {}", e)))?;
        conn.ltrim::<_, ()>(AUDIT_LOG_KEY, 0, MAX_ENTRIES - 1)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to trim audit log: {}", e)))?;

        debug!(
            phone = %mask_phone(&entry.phone),
            success = entry.success,
            "appended audit entry"
        );
        Ok(())
    }
}
