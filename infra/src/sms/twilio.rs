//! Twilio SMS provider
//!
//! Talks to the Messages endpoint of the Twilio REST API directly with HTTP
//! basic auth. Error codes worth distinguishing: 21211 (invalid "To" number)
//! and the 429/exceeded family for quota.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use coop_shared::utils::phone::mask_phone;

use crate::sms::{ProviderError, RejectReason, SmsProvider};

/// Twilio error code for an invalid destination number
const ERR_INVALID_TO_NUMBER: i64 = 21211;

pub struct TwilioProvider {
    client: reqwest::Client,
    account_sid: String,
    auth_header: String,
    from_number: String,
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: Option<String>,
    code: Option<i64>,
    message: Option<String>,
}

impl TwilioProvider {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        let auth_header = format!(
            "Basic {}",
            BASE64.encode(format!("{}:{}", account_sid, auth_token))
        );
        Self {
            client,
            account_sid,
            auth_header,
            from_number,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        )
    }

    fn classify(status: reqwest::StatusCode, body: &TwilioMessageResponse) -> RejectReason {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return RejectReason::QuotaExceeded;
        }
        if body.code == Some(ERR_INVALID_TO_NUMBER) {
            return RejectReason::InvalidNumber;
        }
        let detail = body
            .message
            .clone()
            .unwrap_or_else(|| format!("HTTP {}", status));
        if detail.to_lowercase().contains("exceeded") {
            RejectReason::QuotaExceeded
        } else {
            RejectReason::Other(detail)
        }
    }
}

#[async_trait]
impl SmsProvider for TwilioProvider {
    fn name(&self) -> &'static str {
        "Twilio"
    }

    async fn send(&self, phone: &str, message: &str) -> Result<Option<String>, ProviderError> {
        debug!(phone = %mask_phone(phone), "sending via Twilio");

        let response = self
            .client
            .post(self.messages_url())
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .form(&[
                ("To", phone),
                ("From", self.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body: TwilioMessageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("Unparseable response: {}", e)))?;

        if status.is_success() {
            Ok(body.sid)
        } else {
            Err(ProviderError::Rejected(Self::classify(status, &body)))
        }
    }
}
