//! Shared utility functions

pub mod phone;
pub mod validation;
