use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use coop_shared::types::response::ApiResponse;
use coop_shared::utils::phone::mask_phone;

use crate::dto::auth::{SendCodeRequest, SendCodeResponse};
use crate::errors::to_http_response;
use crate::routes::auth::validation_error_response;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/send-code
///
/// Generates a fresh OTP for the phone number and delivers it through the
/// provider chain. Delivery failure is still a 200: the response says so via
/// `delivered_via_real_sms`, and carries the code itself only when the
/// service is configured to expose it.
pub async fn send_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse {
    if let Err(errors) = request.0.validate() {
        return validation_error_response(errors);
    }

    info!(phone = %mask_phone(&request.phone), "send-code request");

    match state.auth_service.request_phone_code(&request.phone).await {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::success(SendCodeResponse {
            phone: result.phone,
            provider: result.provider,
            delivered_via_real_sms: result.delivered_via_real_sms,
            test_code: result.test_code,
            instructions: result.instructions,
            expires_in_seconds: result.expires_in_seconds,
        })),
        Err(error) => to_http_response(&error),
    }
}
