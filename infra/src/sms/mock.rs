//! Mock SMS provider for development and tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::info;

use coop_shared::utils::phone::mask_phone;

use crate::sms::{ProviderError, RejectReason, SmsProvider};

/// Logs messages instead of sending them. Can be flipped into a failing mode
/// to exercise fallback paths.
#[derive(Default)]
pub struct MockSmsProvider {
    fail: AtomicBool,
    sent: Mutex<Vec<(String, String)>>,
}

impl MockSmsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail with a rejection
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Messages "sent" so far, as (phone, body) pairs
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SmsProvider for MockSmsProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn send(&self, phone: &str, message: &str) -> Result<Option<String>, ProviderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected(RejectReason::Other(
                "mock provider set to fail".to_string(),
            )));
        }

        info!(
            phone = %mask_phone(phone),
            message = %message,
            "[MOCK SMS] message logged instead of sent"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push((phone.to_string(), message.to_string()));
        }

        Ok(Some(format!("mock-{}", uuid::Uuid::new_v4())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_messages() {
        let provider = MockSmsProvider::new();
        let id = provider.send("+15551234567", "code 123456").await.unwrap();
        assert!(id.unwrap().starts_with("mock-"));

        let sent = provider.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+15551234567");
    }

    #[tokio::test]
    async fn test_mock_failing_mode() {
        let provider = MockSmsProvider::new();
        provider.set_failing(true);
        assert!(provider.send("+15551234567", "hi").await.is_err());
    }
}
