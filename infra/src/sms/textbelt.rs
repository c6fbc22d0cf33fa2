//! TextBelt SMS provider
//!
//! Simple JSON-over-HTTP API. The free tier uses the literal key "textbelt"
//! with one message per day; production uses a paid key.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use coop_shared::utils::phone::mask_phone;

use crate::sms::{ProviderError, RejectReason, SmsProvider};

const TEXTBELT_URL: &str = "https://textbelt.com/text";

pub struct TextBeltProvider {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TextBeltResponse {
    success: bool,
    #[serde(rename = "textId")]
    text_id: Option<String>,
    #[serde(rename = "quotaRemaining")]
    quota_remaining: Option<i64>,
    error: Option<String>,
}

impl TextBeltProvider {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, api_key }
    }

    fn classify(error: &str) -> RejectReason {
        let lower = error.to_lowercase();
        if lower.contains("quota") {
            RejectReason::QuotaExceeded
        } else if lower.contains("invalid phone") || lower.contains("number") {
            RejectReason::InvalidNumber
        } else {
            RejectReason::Other(error.to_string())
        }
    }
}

#[async_trait]
impl SmsProvider for TextBeltProvider {
    fn name(&self) -> &'static str {
        "TextBelt"
    }

    async fn send(&self, phone: &str, message: &str) -> Result<Option<String>, ProviderError> {
        debug!(phone = %mask_phone(phone), "sending via TextBelt");

        let response = self
            .client
            .post(TEXTBELT_URL)
            .form(&[("phone", phone), ("message", message), ("key", &self.api_key)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let body: TextBeltResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("Unparseable response: {}", e)))?;

        if body.success {
            if let Some(quota) = body.quota_remaining {
                info!(phone = %mask_phone(phone), quota, "TextBelt accepted message");
            }
            Ok(body.text_id)
        } else {
            let error = body.error.unwrap_or_else(|| "unknown error".to_string());
            Err(ProviderError::Rejected(Self::classify(&error)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_errors() {
        assert_eq!(
            TextBeltProvider::classify("Out of quota"),
            RejectReason::QuotaExceeded
        );
        assert_eq!(
            TextBeltProvider::classify("Invalid phone number"),
            RejectReason::InvalidNumber
        );
        assert_eq!(
            TextBeltProvider::classify("Internal error"),
            RejectReason::Other("Internal error".to_string())
        );
    }

    #[test]
    fn test_response_parsing() {
        let body: TextBeltResponse = serde_json::from_str(
            r#"{"success": true, "textId": "12345", "quotaRemaining": 40}"#,
        )
        .unwrap();
        assert!(body.success);
        assert_eq!(body.text_id.as_deref(), Some("12345"));
        assert_eq!(body.quota_remaining, Some(40));

        let body: TextBeltResponse =
            serde_json::from_str(r#"{"success": false, "error": "Out of quota"}"#).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Out of quota"));
    }
}
