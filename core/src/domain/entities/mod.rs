//! Domain entities

pub mod lockout;
pub mod otp_record;
pub mod verification_log;

pub use lockout::{LockoutDomain, LockoutRecord, LockoutStatus};
pub use otp_record::{DeliveryMethod, OtpRecord};
pub use verification_log::VerificationLogEntry;
