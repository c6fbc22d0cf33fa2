use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use coop_shared::types::response::ApiResponse;
use coop_shared::utils::phone::mask_phone;

use crate::dto::auth::{VerifyCodeRequest, VerifyCodeResponse};
use crate::errors::to_http_response;
use crate::routes::auth::validation_error_response;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/verify-code
///
/// Checks the submitted code against the live record. The caller's device id
/// feeds the OTP lockout domain, so repeated guessing locks the device before
/// it can cycle through fresh codes.
pub async fn verify_code(
    state: web::Data<AppState>,
    request: web::Json<VerifyCodeRequest>,
) -> HttpResponse {
    if let Err(errors) = request.0.validate() {
        return validation_error_response(errors);
    }

    info!(phone = %mask_phone(&request.phone), "verify-code request");

    match state
        .auth_service
        .verify_phone(&request.phone, &request.code, &request.device_id)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(ApiResponse::success(VerifyCodeResponse {
            phone: result.phone,
            verified: true,
        })),
        Err(error) => to_http_response(&error),
    }
}
