//! Delivery-side interface the OTP service depends on

use async_trait::async_trait;
use thiserror::Error;

/// Proof that some provider accepted the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Name of the provider that accepted the message ("TextBelt", "Twilio")
    pub provider: String,

    /// Provider-side message identifier, when the provider returns one
    pub message_id: Option<String>,
}

/// Terminal delivery failure.
///
/// Adapters handle per-provider fallback internally; by the time an error
/// reaches the service, every configured provider has been tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("all SMS providers failed, last was {last_provider}: {detail}")]
    AllProvidersFailed {
        last_provider: String,
        detail: String,
    },
}

/// Outbound SMS delivery with provider fallback behind it
#[async_trait]
pub trait SmsDelivery: Send + Sync {
    /// Deliver a verification code to a normalized phone number
    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}
