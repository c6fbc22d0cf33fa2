//! Route registration and CORS policy

use actix_cors::Cors;
use actix_web::{http::header, web, HttpResponse};

use coop_shared::types::response::ErrorResponse;

use crate::routes::auth::{lockout, login, send_code, signup, verify_code};
use crate::routes::health;

/// Register all routes on the service config
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/send-code", web::post().to(send_code::send_code))
                    .route("/verify-code", web::post().to(verify_code::verify_code))
                    .route("/login", web::post().to(login::login))
                    .route("/signup", web::post().to(signup::signup))
                    .route(
                        "/lockout/{domain}/{key}",
                        web::get().to(lockout::lockout_status),
                    ),
            ),
        )
        .default_service(web::route().to(not_found));
}

/// CORS policy for the mobile clients
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not-found",
        "The requested resource was not found",
    ))
}
