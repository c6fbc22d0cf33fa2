//! Redis-backed lockout store
//!
//! Layout per (domain, device key):
//! - `lockout:{domain}:attempts:{key}` — `INCR` counter with its own TTL
//! - `lockout:{domain}:until:{key}` — RFC 3339 lockout expiry, TTL'd to the
//!   expiry itself so stale lockouts age out of Redis without a sweeper

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tracing::debug;

use coop_core::domain::entities::lockout::{LockoutDomain, LockoutRecord};
use coop_core::errors::{DomainError, DomainResult};
use coop_core::repositories::LockoutStore;

use crate::store::redis_client::RedisClient;

pub struct RedisLockoutStore {
    client: RedisClient,
}

impl RedisLockoutStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn attempts_key(domain: LockoutDomain, key: &str) -> String {
        format!("lockout:{}:attempts:{}", domain.as_str(), key)
    }

    fn until_key(domain: LockoutDomain, key: &str) -> String {
        format!("lockout:{}:until:{}", domain.as_str(), key)
    }
}

#[async_trait]
impl LockoutStore for RedisLockoutStore {
    async fn get(&self, domain: LockoutDomain, key: &str) -> DomainResult<Option<LockoutRecord>> {
        let mut conn = self.client.connection();

        let attempts: Option<u32> = conn
            .get(Self::attempts_key(domain, key))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read lockout counter: {}", e)))?;
        let until: Option<String> = conn
            .get(Self::until_key(domain, key))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read lockout expiry: {}", e)))?;

        if attempts.is_none() && until.is_none() {
            return Ok(None);
        }

        let lockout_until = match until {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| DomainError::internal(format!("Corrupt lockout expiry: {}", e)))?,
            ),
            None => None,
        };

        Ok(Some(LockoutRecord {
            attempt_count: attempts.unwrap_or(0),
            lockout_until,
        }))
    }

    async fn increment_attempts(
        &self,
        domain: LockoutDomain,
        key: &str,
        counter_ttl_seconds: i64,
    ) -> DomainResult<u32> {
        let mut conn = self.client.connection();
        let attempts_key = Self::attempts_key(domain, key);

        let count: u32 = conn
            .incr(&attempts_key, 1)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to increment lockout counter: {}", e)))?;

        conn.expire::<_, bool>(&attempts_key, counter_ttl_seconds)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to expire lockout counter: {}", e)))?;

        debug!(domain = %domain, count, "recorded failed attempt");
        Ok(count)
    }

    async fn set_lockout_until(
        &self,
        domain: LockoutDomain,
        key: &str,
        until: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut conn = self.client.connection();

        let ttl = (until - Utc::now()).num_seconds().max(1) as u64;
        conn.set_ex::<_, _, ()>(Self::until_key(domain, key), until.to_rfc3339(), ttl)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to set lockout expiry: {}", e)))?;

        debug!(domain = %domain, %until, "lockout window set");
        Ok(())
    }

    async fn reset_attempts(&self, domain: LockoutDomain, key: &str) -> DomainResult<()> {
        let mut conn = self.client.connection();
        conn.del::<_, u32>(Self::attempts_key(domain, key))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to reset lockout counter: {}", e)))?;
        Ok(())
    }

    async fn clear(&self, domain: LockoutDomain, key: &str) -> DomainResult<()> {
        let mut conn = self.client.connection();
        conn.del::<_, u32>(Self::attempts_key(domain, key))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to clear lockout counter: {}", e)))?;
        conn.del::<_, u32>(Self::until_key(domain, key))
            .await
            .map_err(|e| DomainError::internal(format!("Failed to clear lockout expiry: {}", e)))?;
        Ok(())
    }
}
