//! # CoopLink Infrastructure
//!
//! Concrete implementations behind the core's repository and delivery traits:
//! Redis-backed OTP and lockout stores, SMS providers with ordered fallback,
//! and the HTTP identity backend.

// Re-export core error types for convenience
pub use coop_core::errors::*;

pub mod identity;
pub mod sms;
pub mod store;

/// Errors raised while wiring infrastructure up; the SMS and identity
/// clients map their transport failures straight into domain errors instead.
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis store error
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::internal(err.to_string())
    }
}
