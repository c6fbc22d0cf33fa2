//! Authentication route handlers
//!
//! - Phone verification (send-code, verify-code)
//! - Email login and signup
//! - Lockout status

pub mod lockout;
pub mod login;
pub mod send_code;
pub mod signup;
pub mod verify_code;

use actix_web::HttpResponse;
use std::collections::HashMap;
use validator::ValidationErrors;

use coop_shared::types::response::ErrorResponse;

/// Convert validator failures into a 400 with per-field messages
pub(crate) fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    let mut details = HashMap::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        details.insert(field.to_string(), serde_json::json!(messages));
    }

    HttpResponse::BadRequest().json(
        ErrorResponse::new("invalid-argument", "Invalid request data").with_details(details),
    )
}
