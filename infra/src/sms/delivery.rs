//! Ordered-fallback SMS gateway
//!
//! Implements the core's [`SmsDelivery`] trait over a chain of providers.
//! Providers are tried strictly in order; the first acceptance wins, and the
//! last failure is what the core hears about when the whole chain fails.

use async_trait::async_trait;
use tracing::{info, warn};

use coop_core::services::otp::{DeliveryError, DeliveryReceipt, SmsDelivery};
use coop_shared::config::sms::SmsConfig;
use coop_shared::utils::phone::mask_phone;

use crate::sms::{build_providers, SmsProvider};

pub struct SmsGateway {
    providers: Vec<Box<dyn SmsProvider>>,
}

impl SmsGateway {
    pub fn new(providers: Vec<Box<dyn SmsProvider>>) -> Self {
        Self { providers }
    }

    /// Build the gateway from configuration
    pub fn from_config(config: &SmsConfig) -> Self {
        Self::new(build_providers(config))
    }

    fn verification_message(code: &str) -> String {
        format!("Your CoopLink verification code is: {}", code)
    }
}

#[async_trait]
impl SmsDelivery for SmsGateway {
    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let message = Self::verification_message(code);
        let mut last_provider = "none".to_string();
        let mut last_detail = "no SMS providers configured".to_string();

        for provider in &self.providers {
            match provider.send(phone, &message).await {
                Ok(message_id) => {
                    info!(
                        phone = %mask_phone(phone),
                        provider = provider.name(),
                        "SMS accepted"
                    );
                    return Ok(DeliveryReceipt {
                        provider: provider.name().to_string(),
                        message_id,
                    });
                }
                Err(e) => {
                    warn!(
                        phone = %mask_phone(phone),
                        provider = provider.name(),
                        error = %e,
                        "provider failed, trying next"
                    );
                    last_provider = provider.name().to_string();
                    last_detail = e.to_string();
                }
            }
        }

        Err(DeliveryError::AllProvidersFailed {
            last_provider,
            detail: last_detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sms::{MockSmsProvider, ProviderError, RejectReason};

    struct AlwaysRejects(&'static str);

    #[async_trait]
    impl SmsProvider for AlwaysRejects {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn send(
            &self,
            _phone: &str,
            _message: &str,
        ) -> Result<Option<String>, ProviderError> {
            Err(ProviderError::Rejected(RejectReason::QuotaExceeded))
        }
    }

    #[tokio::test]
    async fn test_falls_through_to_working_provider() {
        let gateway = SmsGateway::new(vec![
            Box::new(AlwaysRejects("First")),
            Box::new(MockSmsProvider::new()),
        ]);

        let receipt = gateway
            .send_verification_code("+15551234567", "123456")
            .await
            .unwrap();
        assert_eq!(receipt.provider, "Mock");
        assert!(receipt.message_id.is_some());
    }

    #[tokio::test]
    async fn test_reports_last_failure_when_all_fail() {
        let gateway = SmsGateway::new(vec![
            Box::new(AlwaysRejects("First")),
            Box::new(AlwaysRejects("Second")),
        ]);

        let err = gateway
            .send_verification_code("+15551234567", "123456")
            .await
            .unwrap_err();
        match err {
            DeliveryError::AllProvidersFailed { last_provider, .. } => {
                assert_eq!(last_provider, "Second");
            }
        }
    }

    #[tokio::test]
    async fn test_empty_chain_fails() {
        let gateway = SmsGateway::new(Vec::new());
        let err = gateway
            .send_verification_code("+15551234567", "123456")
            .await
            .unwrap_err();
        match err {
            DeliveryError::AllProvidersFailed { last_provider, .. } => {
                assert_eq!(last_provider, "none");
            }
        }
    }

    #[test]
    fn test_message_contains_code() {
        let message = SmsGateway::verification_message("654321");
        assert!(message.contains("654321"));
    }
}
