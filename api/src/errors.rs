//! Domain error to HTTP response mapping
//!
//! Wire codes are part of the client contract: the mobile app switches on
//! `error` to pick the message it shows, so codes here must stay stable.

use actix_web::HttpResponse;
use std::collections::HashMap;

use coop_core::errors::{AuthError, DomainError};
use coop_shared::types::response::ErrorResponse;

/// Map a domain error onto its HTTP status and wire code
pub fn to_http_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth) => auth_error_response(auth),
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(ErrorResponse::new("invalid-argument", message))
        }
        DomainError::Internal { .. } => {
            // Never leak internal details to the client
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "internal",
                "An internal error occurred. Please try again later.",
            ))
        }
    }
}

fn auth_error_response(error: &AuthError) -> HttpResponse {
    let message = error.to_string();
    match error {
        AuthError::InvalidPhoneFormat { .. }
        | AuthError::InvalidEmail
        | AuthError::WeakPassword => {
            HttpResponse::BadRequest().json(ErrorResponse::new("invalid-argument", message))
        }

        AuthError::InvalidVerificationCode { remaining_attempts } => {
            let mut details = HashMap::new();
            details.insert(
                "remaining_attempts".to_string(),
                serde_json::json!(remaining_attempts),
            );
            HttpResponse::BadRequest()
                .json(ErrorResponse::new("invalid-argument", message).with_details(details))
        }

        AuthError::CodeNotFound => {
            HttpResponse::NotFound().json(ErrorResponse::new("not-found", message))
        }

        AuthError::CodeExpired => {
            HttpResponse::Gone().json(ErrorResponse::new("deadline-exceeded", message))
        }

        AuthError::MaxAttemptsExceeded => {
            HttpResponse::TooManyRequests().json(ErrorResponse::new("resource-exhausted", message))
        }

        AuthError::DeviceLockedOut { remaining_ms } => {
            let mut details = HashMap::new();
            details.insert("remaining_ms".to_string(), serde_json::json!(remaining_ms));
            HttpResponse::TooManyRequests()
                .json(ErrorResponse::new("resource-exhausted", message).with_details(details))
        }

        AuthError::CodeAlreadyUsed | AuthError::UserAlreadyExists => {
            HttpResponse::Conflict().json(ErrorResponse::new("already-exists", message))
        }

        AuthError::AuthenticationFailed { remaining_attempts } => {
            let mut details = HashMap::new();
            details.insert(
                "remaining_attempts".to_string(),
                serde_json::json!(remaining_attempts),
            );
            HttpResponse::Unauthorized()
                .json(ErrorResponse::new("unauthenticated", message).with_details(details))
        }
    }
}
