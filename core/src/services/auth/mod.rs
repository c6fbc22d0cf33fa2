//! Authentication orchestration

pub mod service;
pub mod traits;

pub use service::AuthService;
pub use traits::{Identity, IdentityError, IdentityProvider};
