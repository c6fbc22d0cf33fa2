//! Domain-specific error types for the authentication flow
//!
//! Every failure carries enough detail for the client to show one specific
//! message. The API layer maps these onto wire codes (`invalid-argument`,
//! `not-found`, `deadline-exceeded`, `resource-exhausted`, `already-exists`,
//! `internal`).

use thiserror::Error;

/// Authentication and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid phone number format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("Invalid OTP code. {remaining_attempts} attempt(s) remaining.")]
    InvalidVerificationCode { remaining_attempts: u32 },

    #[error("OTP not found or expired")]
    CodeNotFound,

    #[error("OTP has expired. Please request a new one.")]
    CodeExpired,

    #[error("Too many verification attempts. Please request a new OTP.")]
    MaxAttemptsExceeded,

    #[error("OTP has already been used. Please request a new one.")]
    CodeAlreadyUsed,

    #[error("Device temporarily locked. Try again in {remaining_ms} ms.")]
    DeviceLockedOut { remaining_ms: i64 },

    #[error("Incorrect email or password. {remaining_attempts} attempt(s) remaining.")]
    AuthenticationFailed { remaining_attempts: u32 },

    #[error("An account already exists for this email")]
    UserAlreadyExists,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 8 characters with upper and lower case letters, a digit, and a special character")]
    WeakPassword,
}

/// Top-level domain error
#[derive(Error, Debug)]
pub enum DomainError {
    /// Typed authentication/verification failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Input validation failure outside the auth taxonomy
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Unexpected storage/transport fault
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Shorthand for an internal error with a formatted message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The typed auth error, if this is one
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            DomainError::Auth(e) => Some(e),
            _ => None,
        }
    }
}

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
