//! Authentication service: login, signup, and phone verification
//!
//! Wraps the identity provider and OTP service with per-device lockout
//! enforcement. The device key is a caller-supplied opaque identifier; the
//! guard never inspects it.

use std::sync::Arc;

use tracing::info;

use coop_shared::utils::validation::{is_strong_password, is_valid_email};

use crate::domain::entities::lockout::LockoutDomain;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::services::auth::traits::{Identity, IdentityError, IdentityProvider};
use crate::services::lockout::LockoutGuard;
use crate::services::otp::types::{RequestOtpResult, VerifyOtpResult};
use crate::services::otp::OtpService;

pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    otp: Arc<OtpService>,
    lockout: Arc<LockoutGuard>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        otp: Arc<OtpService>,
        lockout: Arc<LockoutGuard>,
    ) -> Self {
        Self {
            identity,
            otp,
            lockout,
        }
    }

    /// Email/password sign-in, gated by the login lockout domain
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        device_key: &str,
    ) -> DomainResult<Identity> {
        let status = self.lockout.check_lockout(LockoutDomain::Login, device_key).await;
        if status.is_locked_out {
            return Err(AuthError::DeviceLockedOut {
                remaining_ms: status.remaining_ms,
            }
            .into());
        }

        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail.into());
        }

        match self.identity.sign_in(email, password).await {
            Ok(identity) => {
                self.lockout
                    .reset_attempts(LockoutDomain::Login, device_key)
                    .await;
                info!(user_id = %identity.user_id, "sign-in succeeded");
                Ok(identity)
            }
            Err(IdentityError::InvalidCredentials) => {
                self.lockout
                    .record_failure(LockoutDomain::Login, device_key)
                    .await;
                let remaining = self
                    .lockout
                    .remaining_attempts(LockoutDomain::Login, device_key)
                    .await;
                Err(AuthError::AuthenticationFailed {
                    remaining_attempts: remaining,
                }
                .into())
            }
            Err(IdentityError::AlreadyExists) => {
                // Provider contract violation for sign-in
                Err(DomainError::internal("unexpected provider response"))
            }
            Err(IdentityError::Unavailable { detail }) => Err(DomainError::internal(detail)),
        }
    }

    /// Account creation with email and password strength validation
    pub async fn sign_up(&self, email: &str, password: &str) -> DomainResult<Identity> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail.into());
        }
        if !is_strong_password(password) {
            return Err(AuthError::WeakPassword.into());
        }

        match self.identity.sign_up(email, password).await {
            Ok(identity) => {
                info!(user_id = %identity.user_id, "account created");
                Ok(identity)
            }
            Err(IdentityError::AlreadyExists) => Err(AuthError::UserAlreadyExists.into()),
            Err(IdentityError::InvalidCredentials) => {
                Err(DomainError::internal("unexpected provider response"))
            }
            Err(IdentityError::Unavailable { detail }) => Err(DomainError::internal(detail)),
        }
    }

    /// Issue and deliver a verification code for a phone number
    pub async fn request_phone_code(&self, phone: &str) -> DomainResult<RequestOtpResult> {
        self.otp.request_otp(phone).await
    }

    /// Verify a submitted code, gated by the OTP lockout domain.
    ///
    /// Only code-guessing failures feed the lockout counter; expiry and
    /// missing records do not, since they say nothing about brute force.
    pub async fn verify_phone(
        &self,
        phone: &str,
        code: &str,
        device_key: &str,
    ) -> DomainResult<VerifyOtpResult> {
        let status = self.lockout.check_lockout(LockoutDomain::Otp, device_key).await;
        if status.is_locked_out {
            return Err(AuthError::DeviceLockedOut {
                remaining_ms: status.remaining_ms,
            }
            .into());
        }

        match self.otp.verify_otp(phone, code).await {
            Ok(result) => {
                self.lockout
                    .reset_attempts(LockoutDomain::Otp, device_key)
                    .await;
                Ok(result)
            }
            Err(err) => {
                if matches!(
                    err.as_auth(),
                    Some(AuthError::InvalidVerificationCode { .. })
                        | Some(AuthError::MaxAttemptsExceeded)
                ) {
                    self.lockout
                        .record_failure(LockoutDomain::Otp, device_key)
                        .await;
                }
                Err(err)
            }
        }
    }
}
