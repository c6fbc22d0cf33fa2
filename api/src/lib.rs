//! # CoopLink API
//!
//! HTTP layer for the CoopLink auth flow: OTP send/verify, email login and
//! signup, and the lockout status endpoint.

pub mod app;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod state;
