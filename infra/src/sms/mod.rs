//! SMS provider implementations
//!
//! Each provider implements [`SmsProvider`]; the [`SmsGateway`] walks the
//! configured providers in order and reports a single terminal failure to the
//! core once every provider has been tried.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use coop_shared::config::sms::SmsConfig;

pub mod delivery;
pub mod mock;
pub mod textbelt;
pub mod twilio;

pub use delivery::SmsGateway;
pub use mock::MockSmsProvider;
pub use textbelt::TextBeltProvider;
pub use twilio::TwilioProvider;

/// Why a provider refused the message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The account/key is out of sending quota
    QuotaExceeded,
    /// The provider considers the destination number invalid
    InvalidNumber,
    /// Any other provider-side rejection
    Other(String),
}

/// A single provider attempt failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider rejected the message: {0:?}")]
    Rejected(RejectReason),
}

/// One SMS carrier integration
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Stable provider name used in receipts and logs
    fn name(&self) -> &'static str;

    /// Send one message, returning the provider-side message id when known
    async fn send(&self, phone: &str, message: &str) -> Result<Option<String>, ProviderError>;
}

/// Build the ordered provider chain from configuration.
///
/// Unknown provider names are skipped with a warning rather than failing
/// startup; an empty chain still works, it just always falls back.
pub fn build_providers(config: &SmsConfig) -> Vec<Box<dyn SmsProvider>> {
    let mut providers: Vec<Box<dyn SmsProvider>> = Vec::new();

    for name in &config.providers {
        match name.as_str() {
            "textbelt" => providers.push(Box::new(TextBeltProvider::new(
                config.textbelt_key.clone(),
                config.provider_timeout_secs,
            ))),
            "twilio" => {
                if config.twilio_account_sid.is_empty() || config.twilio_auth_token.is_empty() {
                    warn!("Twilio credentials missing, skipping provider");
                    continue;
                }
                providers.push(Box::new(TwilioProvider::new(
                    config.twilio_account_sid.clone(),
                    config.twilio_auth_token.clone(),
                    config.from_number.clone(),
                    config.provider_timeout_secs,
                )));
            }
            "mock" => providers.push(Box::new(MockSmsProvider::new())),
            other => {
                warn!("Unknown SMS provider '{}', skipping", other);
            }
        }
    }

    providers
}
