use actix_web::{web, HttpResponse};

use coop_core::domain::entities::lockout::LockoutDomain;
use coop_core::services::lockout::format_remaining;
use coop_shared::types::response::{ApiResponse, ErrorResponse};

use crate::dto::auth::LockoutStatusResponse;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/lockout/{domain}/{key}
///
/// Lets the client render its countdown without attempting the flow first.
pub async fn lockout_status(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (domain_raw, key) = path.into_inner();

    let Some(domain) = LockoutDomain::parse(&domain_raw) else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "invalid-argument",
            format!("Unknown lockout domain: {}", domain_raw),
        ));
    };

    let status = state.lockout_guard.check_lockout(domain, &key).await;

    HttpResponse::Ok().json(ApiResponse::success(LockoutStatusResponse {
        is_locked_out: status.is_locked_out,
        remaining_ms: status.remaining_ms,
        remaining_display: format_remaining(status.remaining_ms),
    }))
}
