//! Error types for the domain layer

pub mod domain_error;

pub use domain_error::{AuthError, DomainError, DomainResult};
