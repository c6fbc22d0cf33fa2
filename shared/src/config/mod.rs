//! Configuration modules for the CoopLink backend
//!
//! Policy constants (OTP TTL, attempt limits, lockout duration) live in
//! explicit config structs passed into service constructors rather than
//! ambient globals, so tests can run with short windows.

pub mod cache;
pub mod lockout;
pub mod otp;
pub mod server;
pub mod sms;

pub use cache::CacheConfig;
pub use lockout::{FailurePolicy, LockoutConfig};
pub use otp::OtpConfig;
pub use server::ServerConfig;
pub use sms::SmsConfig;
