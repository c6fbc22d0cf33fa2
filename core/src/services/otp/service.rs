//! OTP lifecycle service

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use coop_shared::config::otp::OtpConfig;
use coop_shared::utils::phone::{mask_phone, normalize_phone};

use crate::domain::entities::otp_record::{DeliveryMethod, OtpRecord};
use crate::domain::entities::verification_log::VerificationLogEntry;
use crate::errors::{AuthError, DomainResult};
use crate::repositories::{OtpStore, VerificationLogRepository};
use crate::services::otp::traits::{DeliveryError, SmsDelivery};
use crate::services::otp::types::{RequestOtpResult, VerifyOtpResult};

/// Manages the full lifecycle of one-time passcodes.
///
/// One live code per phone number: requesting a new code overwrites any
/// pending one. The record is written to the store BEFORE delivery is
/// attempted so that a delivery failure still leaves a verifiable code
/// behind (the local-fallback path).
pub struct OtpService {
    store: Arc<dyn OtpStore>,
    delivery: Arc<dyn SmsDelivery>,
    audit: Arc<dyn VerificationLogRepository>,
    config: OtpConfig,
}

impl OtpService {
    pub fn new(
        store: Arc<dyn OtpStore>,
        delivery: Arc<dyn SmsDelivery>,
        audit: Arc<dyn VerificationLogRepository>,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            delivery,
            audit,
            config,
        }
    }

    /// Generate, store, and deliver a fresh code for `phone`.
    ///
    /// Delivery failure is not an error: the record falls back to
    /// `local_fallback` and, when `expose_test_code` is enabled, the code is
    /// returned to the caller for manual entry.
    pub async fn request_otp(&self, phone: &str) -> DomainResult<RequestOtpResult> {
        let normalized = normalize_phone(phone).ok_or(AuthError::InvalidPhoneFormat {
            phone: phone.to_string(),
        })?;

        let mut record = OtpRecord::new(
            normalized.clone(),
            self.config.ttl_seconds,
            self.config.max_attempts,
        );

        // Store before delivery so a provider outage never loses the code
        self.store.put(&record).await?;

        match self
            .delivery
            .send_verification_code(&normalized, &record.code)
            .await
        {
            Ok(receipt) => {
                record.method = DeliveryMethod::Sms {
                    provider: receipt.provider.clone(),
                };
                self.store.put(&record).await?;

                info!(
                    phone = %mask_phone(&normalized),
                    provider = %receipt.provider,
                    "verification code delivered"
                );

                Ok(RequestOtpResult {
                    phone: normalized,
                    provider: Some(receipt.provider),
                    delivered_via_real_sms: true,
                    test_code: None,
                    instructions: "A verification code has been sent to your phone.".to_string(),
                    message_id: receipt.message_id,
                    expires_in_seconds: self.config.ttl_seconds,
                })
            }
            Err(DeliveryError::AllProvidersFailed {
                last_provider,
                detail,
            }) => {
                record.method = DeliveryMethod::LocalFallback;
                self.store.put(&record).await?;

                warn!(
                    phone = %mask_phone(&normalized),
                    last_provider = %last_provider,
                    detail = %detail,
                    "SMS delivery failed, falling back to locally stored code"
                );

                let test_code = self
                    .config
                    .expose_test_code
                    .then(|| record.code.clone());

                let instructions = if test_code.is_some() {
                    "SMS delivery failed. Use the test code to verify.".to_string()
                } else {
                    "SMS delivery failed. Please try again shortly.".to_string()
                };

                Ok(RequestOtpResult {
                    phone: normalized,
                    provider: None,
                    delivered_via_real_sms: false,
                    test_code,
                    instructions,
                    message_id: None,
                    expires_in_seconds: self.config.ttl_seconds,
                })
            }
        }
    }

    /// Verify a submitted code against the live record for `phone`.
    ///
    /// Every terminal outcome (success, expiry, exhaustion) deletes the
    /// record; only a plain mismatch with attempts remaining leaves it in
    /// place. Mismatch counting goes through the store's atomic increment so
    /// concurrent attempts cannot slip past the ceiling.
    pub async fn verify_otp(&self, phone: &str, code: &str) -> DomainResult<VerifyOtpResult> {
        let normalized = normalize_phone(phone).ok_or(AuthError::InvalidPhoneFormat {
            phone: phone.to_string(),
        })?;

        let record = match self.store.get(&normalized).await? {
            Some(record) => record,
            None => {
                self.audit_failure(&normalized, "pending", 0, "not_found").await;
                return Err(AuthError::CodeNotFound.into());
            }
        };
        let method_label = record.method.label();

        if record.verified {
            self.audit_failure(&normalized, &method_label, record.attempts, "already_used")
                .await;
            return Err(AuthError::CodeAlreadyUsed.into());
        }

        if record.is_expired() {
            self.store.delete(&normalized).await?;
            self.audit_failure(&normalized, &method_label, record.attempts, "expired")
                .await;
            return Err(AuthError::CodeExpired.into());
        }

        if record.is_exhausted() {
            self.store.delete(&normalized).await?;
            self.audit_failure(&normalized, &method_label, record.attempts, "max_attempts")
                .await;
            return Err(AuthError::MaxAttemptsExceeded.into());
        }

        if !record.matches(code) {
            let attempts = match self.store.increment_attempts(&normalized).await? {
                Some(n) => n,
                // Deleted by a concurrent request between get and increment
                None => {
                    self.audit_failure(&normalized, &method_label, record.attempts, "not_found")
                        .await;
                    return Err(AuthError::CodeNotFound.into());
                }
            };

            if attempts >= record.max_attempts {
                self.store.delete(&normalized).await?;
                self.audit_failure(&normalized, &method_label, attempts, "max_attempts")
                    .await;
                return Err(AuthError::MaxAttemptsExceeded.into());
            }

            let remaining = record.max_attempts - attempts;
            self.audit_failure(&normalized, &method_label, attempts, "invalid_code")
                .await;
            return Err(AuthError::InvalidVerificationCode {
                remaining_attempts: remaining,
            }
            .into());
        }

        // Matched: mark, delete, audit. The verified flag is persisted only
        // transiently; deletion is the terminal state.
        let mut verified = record.clone();
        verified.verified = true;
        self.store.put(&verified).await?;
        self.store.delete(&normalized).await?;

        self.audit(VerificationLogEntry::success(
            &normalized,
            &method_label,
            record.attempts + 1,
        ))
        .await;

        info!(
            phone = %mask_phone(&normalized),
            method = %method_label,
            "phone number verified"
        );

        Ok(VerifyOtpResult {
            phone: normalized,
            method: record.method,
        })
    }

    /// Seconds until the live code for `phone` expires, if one exists
    pub async fn remaining_ttl(&self, phone: &str) -> DomainResult<Option<i64>> {
        let normalized = normalize_phone(phone).ok_or(AuthError::InvalidPhoneFormat {
            phone: phone.to_string(),
        })?;

        Ok(self.store.get(&normalized).await?.map(|record| {
            (record.expires_at - Utc::now()).num_seconds().max(0)
        }))
    }

    async fn audit_failure(&self, phone: &str, method: &str, attempts: u32, kind: &str) {
        self.audit(VerificationLogEntry::failure(phone, method, attempts, kind))
            .await;
    }

    // Audit append failures never fail the verification itself
    async fn audit(&self, entry: VerificationLogEntry) {
        if let Err(e) = self.audit.append(&entry).await {
            warn!(error = %e, "failed to append verification log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryOtpStore, InMemoryVerificationLog};
    use crate::services::otp::traits::DeliveryReceipt;
    use async_trait::async_trait;

    struct StubDelivery {
        outcome: Result<DeliveryReceipt, DeliveryError>,
    }

    impl StubDelivery {
        fn delivering(provider: &str) -> Self {
            Self {
                outcome: Ok(DeliveryReceipt {
                    provider: provider.to_string(),
                    message_id: Some("msg-1".to_string()),
                }),
            }
        }

        fn failing() -> Self {
            Self {
                outcome: Err(DeliveryError::AllProvidersFailed {
                    last_provider: "Twilio".to_string(),
                    detail: "quota exceeded".to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl SmsDelivery for StubDelivery {
        async fn send_verification_code(
            &self,
            _phone: &str,
            _code: &str,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            self.outcome.clone()
        }
    }

    fn service(
        delivery: StubDelivery,
        config: OtpConfig,
    ) -> (OtpService, Arc<InMemoryOtpStore>, Arc<InMemoryVerificationLog>) {
        let store = Arc::new(InMemoryOtpStore::new());
        let audit = Arc::new(InMemoryVerificationLog::new());
        let svc = OtpService::new(store.clone(), Arc::new(delivery), audit.clone(), config);
        (svc, store, audit)
    }

    #[tokio::test]
    async fn test_request_delivers_and_stores() {
        let (svc, store, _) = service(StubDelivery::delivering("TextBelt"), OtpConfig::default());

        let result = svc.request_otp("+1 555 123 4567").await.unwrap();
        assert_eq!(result.phone, "+15551234567");
        assert!(result.delivered_via_real_sms);
        assert_eq!(result.provider.as_deref(), Some("TextBelt"));
        assert!(result.test_code.is_none());

        let record = store.get("+15551234567").await.unwrap().unwrap();
        assert_eq!(
            record.method,
            DeliveryMethod::Sms {
                provider: "TextBelt".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_request_rejects_invalid_phone() {
        let (svc, _, _) = service(StubDelivery::delivering("TextBelt"), OtpConfig::default());

        let err = svc.request_otp("not-a-number").await.unwrap_err();
        assert!(matches!(
            err.as_auth(),
            Some(AuthError::InvalidPhoneFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_delivery_failure_falls_back_without_code_by_default() {
        let (svc, store, _) = service(StubDelivery::failing(), OtpConfig::default());

        let result = svc.request_otp("+15551234567").await.unwrap();
        assert!(!result.delivered_via_real_sms);
        assert!(result.provider.is_none());
        assert!(result.test_code.is_none());

        // The code is still verifiable from storage
        let record = store.get("+15551234567").await.unwrap().unwrap();
        assert_eq!(record.method, DeliveryMethod::LocalFallback);
    }

    #[tokio::test]
    async fn test_delivery_failure_exposes_code_when_enabled() {
        let config = OtpConfig {
            expose_test_code: true,
            ..OtpConfig::default()
        };
        let (svc, store, _) = service(StubDelivery::failing(), config);

        let result = svc.request_otp("+15551234567").await.unwrap();
        let record = store.get("+15551234567").await.unwrap().unwrap();
        assert_eq!(result.test_code.as_deref(), Some(record.code.as_str()));
    }

    #[tokio::test]
    async fn test_new_request_overwrites_pending_code() {
        let (svc, store, _) = service(StubDelivery::delivering("TextBelt"), OtpConfig::default());

        svc.request_otp("+15551234567").await.unwrap();
        let first = store.get("+15551234567").await.unwrap().unwrap();

        svc.request_otp("+15551234567").await.unwrap();
        let second = store.get("+15551234567").await.unwrap().unwrap();

        assert!(second.created_at >= first.created_at);
        assert_eq!(second.attempts, 0);
    }

    #[tokio::test]
    async fn test_verify_success_deletes_record() {
        let (svc, store, audit) =
            service(StubDelivery::delivering("TextBelt"), OtpConfig::default());

        svc.request_otp("+15551234567").await.unwrap();
        let code = store.get("+15551234567").await.unwrap().unwrap().code;

        let result = svc.verify_otp("+15551234567", &code).await.unwrap();
        assert_eq!(result.phone, "+15551234567");

        assert!(store.get("+15551234567").await.unwrap().is_none());
        let entries = audit.entries().await;
        assert!(entries.last().unwrap().success);
    }

    #[tokio::test]
    async fn test_verify_unknown_phone() {
        let (svc, _, audit) = service(StubDelivery::delivering("TextBelt"), OtpConfig::default());

        let err = svc.verify_otp("+15551234567", "123456").await.unwrap_err();
        assert!(matches!(err.as_auth(), Some(AuthError::CodeNotFound)));
        assert_eq!(audit.entries().await[0].error.as_deref(), Some("not_found"));
    }

    #[tokio::test]
    async fn test_verify_expired_deletes_record() {
        let config = OtpConfig {
            ttl_seconds: 0,
            ..OtpConfig::default()
        };
        let (svc, store, audit) = service(StubDelivery::delivering("TextBelt"), config);

        svc.request_otp("+15551234567").await.unwrap();
        let code = store.get("+15551234567").await.unwrap().unwrap().code;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let err = svc.verify_otp("+15551234567", &code).await.unwrap_err();
        assert!(matches!(err.as_auth(), Some(AuthError::CodeExpired)));
        assert!(store.get("+15551234567").await.unwrap().is_none());
        assert_eq!(
            audit.entries().await.last().unwrap().error.as_deref(),
            Some("expired")
        );
    }

    #[tokio::test]
    async fn test_verify_mismatch_counts_down() {
        let config = OtpConfig {
            max_attempts: 3,
            ..OtpConfig::default()
        };
        let (svc, store, _) = service(StubDelivery::delivering("TextBelt"), config);

        svc.request_otp("+15551234567").await.unwrap();

        let err = svc.verify_otp("+15551234567", "000000").await.unwrap_err();
        assert_eq!(
            err.as_auth(),
            Some(&AuthError::InvalidVerificationCode {
                remaining_attempts: 2
            })
        );

        let err = svc.verify_otp("+15551234567", "000000").await.unwrap_err();
        assert_eq!(
            err.as_auth(),
            Some(&AuthError::InvalidVerificationCode {
                remaining_attempts: 1
            })
        );

        // Third mismatch reaches the ceiling and deletes the record
        let err = svc.verify_otp("+15551234567", "000000").await.unwrap_err();
        assert!(matches!(err.as_auth(), Some(AuthError::MaxAttemptsExceeded)));
        assert!(store.get("+15551234567").await.unwrap().is_none());

        // A correct code afterwards cannot succeed
        let err = svc.verify_otp("+15551234567", "000000").await.unwrap_err();
        assert!(matches!(err.as_auth(), Some(AuthError::CodeNotFound)));
    }

    #[tokio::test]
    async fn test_verify_succeeds_on_last_remaining_attempt() {
        let config = OtpConfig {
            max_attempts: 2,
            ..OtpConfig::default()
        };
        let (svc, store, _) = service(StubDelivery::delivering("TextBelt"), config);

        svc.request_otp("+15551234567").await.unwrap();
        let code = store.get("+15551234567").await.unwrap().unwrap().code;

        svc.verify_otp("+15551234567", "000000").await.unwrap_err();
        let result = svc.verify_otp("+15551234567", &code).await.unwrap();
        assert_eq!(result.phone, "+15551234567");
    }

    #[tokio::test]
    async fn test_remaining_ttl() {
        let (svc, _, _) = service(StubDelivery::delivering("TextBelt"), OtpConfig::default());

        assert_eq!(svc.remaining_ttl("+15551234567").await.unwrap(), None);

        svc.request_otp("+15551234567").await.unwrap();
        let ttl = svc.remaining_ttl("+15551234567").await.unwrap().unwrap();
        assert!(ttl > 0 && ttl <= 300);
    }
}
