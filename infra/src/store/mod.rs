//! Redis-backed implementations of the core repository traits

pub mod lockout_store;
pub mod otp_store;
pub mod redis_client;
pub mod verification_log;

pub use lockout_store::RedisLockoutStore;
pub use otp_store::RedisOtpStore;
pub use redis_client::RedisClient;
pub use verification_log::RedisVerificationLog;

// Re-export the shared cache config for callers wiring things up
pub use coop_shared::config::cache::CacheConfig;
