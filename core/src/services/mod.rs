//! Business logic services
//!
//! Services orchestrate entities, repositories, and delivery adapters. They
//! hold no mutable state of their own; everything persisted goes through the
//! repository traits so the same logic runs against Redis or memory.

pub mod auth;
pub mod lockout;
pub mod otp;

pub use auth::AuthService;
pub use lockout::LockoutGuard;
pub use otp::OtpService;
