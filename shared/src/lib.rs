//! # CoopLink Shared
//!
//! Configuration, common response types, and validation utilities shared
//! across the CoopLink backend crates.

pub mod config;
pub mod types;
pub mod utils;
