//! SMS delivery configuration

use serde::{Deserialize, Serialize};

/// Per-provider request timeout in seconds
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// SMS delivery configuration
///
/// Providers are tried in the order listed in `providers`; delivery falls
/// back to local/display mode when every provider fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Ordered provider names ("textbelt", "twilio", "mock")
    pub providers: Vec<String>,

    /// TextBelt API key ("textbelt" uses the free quota key)
    pub textbelt_key: String,

    /// Twilio Account SID
    pub twilio_account_sid: String,

    /// Twilio Auth Token
    pub twilio_auth_token: String,

    /// From phone number for carrier providers (E.164)
    pub from_number: String,

    /// Timeout for a single provider attempt, in seconds
    pub provider_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            providers: vec!["mock".to_string()],
            textbelt_key: "textbelt".to_string(),
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            from_number: "+15005550006".to_string(),
            provider_timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

impl SmsConfig {
    /// Load from environment variables, falling back to defaults
    ///
    /// * `COOP_SMS_PROVIDERS` — comma-separated, e.g. "textbelt,twilio"
    /// * `TEXTBELT_API_KEY`
    /// * `TWILIO_ACCOUNT_SID` / `TWILIO_AUTH_TOKEN`
    /// * `SMS_FROM_NUMBER`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            providers: std::env::var("COOP_SMS_PROVIDERS")
                .map(|v| {
                    v.split(',')
                        .map(|p| p.trim().to_lowercase())
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.providers),
            textbelt_key: std::env::var("TEXTBELT_API_KEY")
                .unwrap_or(defaults.textbelt_key),
            twilio_account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            from_number: std::env::var("SMS_FROM_NUMBER").unwrap_or(defaults.from_number),
            provider_timeout_secs: std::env::var("COOP_SMS_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.provider_timeout_secs),
        }
    }
}
