//! OTP lifecycle: generation, delivery, verification

pub mod service;
pub mod traits;
pub mod types;

pub use service::OtpService;
pub use traits::{DeliveryError, DeliveryReceipt, SmsDelivery};
pub use types::{RequestOtpResult, VerifyOtpResult};
