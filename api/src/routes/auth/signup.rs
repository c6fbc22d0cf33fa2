use actix_web::{web, HttpResponse};
use validator::Validate;

use coop_shared::types::response::ApiResponse;

use crate::dto::auth::{AccountResponse, SignupRequest};
use crate::errors::to_http_response;
use crate::routes::auth::validation_error_response;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/signup
pub async fn signup(state: web::Data<AppState>, request: web::Json<SignupRequest>) -> HttpResponse {
    if let Err(errors) = request.0.validate() {
        return validation_error_response(errors);
    }

    match state
        .auth_service
        .sign_up(&request.email, &request.password)
        .await
    {
        Ok(identity) => HttpResponse::Created().json(ApiResponse::success(AccountResponse {
            user_id: identity.user_id,
            email: identity.email,
        })),
        Err(error) => to_http_response(&error),
    }
}
