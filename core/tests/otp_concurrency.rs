//! Concurrent verification attempts must respect the attempt ceiling exactly.

use std::sync::Arc;

use async_trait::async_trait;
use coop_core::errors::AuthError;
use coop_core::repositories::{InMemoryOtpStore, InMemoryVerificationLog, OtpStore};
use coop_core::services::otp::{DeliveryError, DeliveryReceipt, OtpService, SmsDelivery};
use coop_shared::config::otp::OtpConfig;

struct AlwaysDelivers;

#[async_trait]
impl SmsDelivery for AlwaysDelivers {
    async fn send_verification_code(
        &self,
        _phone: &str,
        _code: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        Ok(DeliveryReceipt {
            provider: "TextBelt".to_string(),
            message_id: None,
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_wrong_codes_never_exceed_the_ceiling() {
    const MAX_ATTEMPTS: u32 = 5;
    const TASKS: usize = 20;

    let store = Arc::new(InMemoryOtpStore::new());
    let service = Arc::new(OtpService::new(
        store.clone(),
        Arc::new(AlwaysDelivers),
        Arc::new(InMemoryVerificationLog::new()),
        OtpConfig {
            max_attempts: MAX_ATTEMPTS,
            ..OtpConfig::default()
        },
    ));

    service.request_otp("+15551234567").await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..TASKS {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.verify_otp("+15551234567", "000000").await
        }));
    }

    let mut invalid = 0usize;
    let mut exhausted = 0usize;
    let mut not_found = 0usize;
    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        match err.as_auth() {
            Some(AuthError::InvalidVerificationCode { .. }) => invalid += 1,
            Some(AuthError::MaxAttemptsExceeded) => exhausted += 1,
            Some(AuthError::CodeNotFound) => not_found += 1,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    // The atomic counter hands out at most MAX_ATTEMPTS - 1 "attempts
    // remaining" responses; everything past the ceiling sees exhaustion or
    // a deleted record.
    assert!(invalid <= (MAX_ATTEMPTS - 1) as usize, "invalid = {invalid}");
    assert!(exhausted >= 1);
    assert_eq!(invalid + exhausted + not_found, TASKS);

    // Terminal state: the record is gone and the correct code is dead
    assert!(store.get("+15551234567").await.unwrap().is_none());
    let err = service.verify_otp("+15551234567", "000000").await.unwrap_err();
    assert!(matches!(err.as_auth(), Some(AuthError::CodeNotFound)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_correct_code_verifies_once_or_reports_terminal_state() {
    let store = Arc::new(InMemoryOtpStore::new());
    let service = Arc::new(OtpService::new(
        store.clone(),
        Arc::new(AlwaysDelivers),
        Arc::new(InMemoryVerificationLog::new()),
        OtpConfig::default(),
    ));

    service.request_otp("+15551234567").await.unwrap();
    let code = store.get("+15551234567").await.unwrap().unwrap().code;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            service.verify_otp("+15551234567", &code).await
        }));
    }

    let mut successes = 0usize;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(err) => {
                assert!(matches!(
                    err.as_auth(),
                    Some(AuthError::CodeNotFound) | Some(AuthError::CodeAlreadyUsed)
                ));
            }
        }
    }

    assert!(successes >= 1);
    assert!(store.get("+15551234567").await.unwrap().is_none());
}
