//! Per-device brute-force lockout

pub mod guard;

pub use guard::{format_remaining, LockoutGuard};
