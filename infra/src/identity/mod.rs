//! Identity backend client

pub mod http;

pub use http::{HttpIdentityProvider, IdentityBackendConfig};
