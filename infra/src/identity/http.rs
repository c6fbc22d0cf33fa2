//! HTTP client for the identity backend
//!
//! The identity backend owns credential storage and session issuance; this
//! client maps its HTTP responses onto the core's [`IdentityError`] taxonomy:
//! 401 is bad credentials, 409 is a duplicate account, everything else is
//! "unavailable" and surfaces as an internal error upstream.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use coop_core::services::auth::{Identity, IdentityError, IdentityProvider};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the identity backend
#[derive(Debug, Clone)]
pub struct IdentityBackendConfig {
    /// Base URL, e.g. "https://identity.internal"
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl IdentityBackendConfig {
    /// Load from `IDENTITY_BACKEND_URL` and `IDENTITY_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("IDENTITY_BACKEND_URL")
                .unwrap_or_else(|_| "http://localhost:9099".to_string()),
            timeout_secs: std::env::var("IDENTITY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    user_id: String,
    email: String,
}

impl HttpIdentityProvider {
    pub fn new(config: &IdentityBackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        debug!(path, "calling identity backend");

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&CredentialsBody { email, password })
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            let account: AccountResponse =
                response.json().await.map_err(|e| IdentityError::Unavailable {
                    detail: format!("Unparseable identity response: {}", e),
                })?;
            return Ok(Identity {
                user_id: account.user_id,
                email: account.email,
            });
        }

        match status.as_u16() {
            401 | 403 => Err(IdentityError::InvalidCredentials),
            409 => Err(IdentityError::AlreadyExists),
            code => Err(IdentityError::Unavailable {
                detail: format!("identity backend returned HTTP {}", code),
            }),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.post_credentials("/v1/sign-in", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        self.post_credentials("/v1/sign-up", email, password).await
    }
}
