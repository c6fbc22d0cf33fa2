use actix_web::{web, HttpResponse};
use validator::Validate;

use coop_shared::types::response::ApiResponse;

use crate::dto::auth::{AccountResponse, LoginRequest};
use crate::errors::to_http_response;
use crate::routes::auth::validation_error_response;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
pub async fn login(state: web::Data<AppState>, request: web::Json<LoginRequest>) -> HttpResponse {
    if let Err(errors) = request.0.validate() {
        return validation_error_response(errors);
    }

    match state
        .auth_service
        .sign_in(&request.email, &request.password, &request.device_id)
        .await
    {
        Ok(identity) => HttpResponse::Ok().json(ApiResponse::success(AccountResponse {
            user_id: identity.user_id,
            email: identity.email,
        })),
        Err(error) => to_http_response(&error),
    }
}
