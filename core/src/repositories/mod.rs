//! Repository interfaces for persisted state
//!
//! The core holds no in-process shared mutable state; everything lives behind
//! these traits in an external store keyed by phone number or device id.
//! In-memory implementations back the test suites and local development.

pub mod lockout_store;
pub mod memory;
pub mod otp_store;
pub mod verification_log;

pub use lockout_store::LockoutStore;
pub use memory::{InMemoryLockoutStore, InMemoryOtpStore, InMemoryVerificationLog};
pub use otp_store::OtpStore;
pub use verification_log::VerificationLogRepository;
