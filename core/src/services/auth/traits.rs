//! Identity provider interface
//!
//! Credential storage and session issuance live behind this trait; the core
//! only orchestrates lockout and validation around it.

use async_trait::async_trait;
use thiserror::Error;

/// An authenticated account as the provider reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned user identifier
    pub user_id: String,

    /// Email address on the account
    pub email: String,
}

/// Failures from the identity provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account already exists for this email")]
    AlreadyExists,

    #[error("identity provider unavailable: {detail}")]
    Unavailable { detail: String },
}

/// Email/password credential backend
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate an existing account
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;

    /// Create a new account
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
}
