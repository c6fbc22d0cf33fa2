use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use coop_api::app::{configure_routes, create_cors};
use coop_api::state::AppState;
use coop_core::services::auth::AuthService;
use coop_core::services::lockout::LockoutGuard;
use coop_core::services::otp::OtpService;
use coop_infra::identity::{HttpIdentityProvider, IdentityBackendConfig};
use coop_infra::sms::SmsGateway;
use coop_infra::store::{RedisClient, RedisLockoutStore, RedisOtpStore, RedisVerificationLog};
use coop_shared::config::{CacheConfig, LockoutConfig, OtpConfig, ServerConfig, SmsConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting CoopLink API server");

    let server_config = ServerConfig::from_env();
    let cache_config = CacheConfig::from_env();
    let otp_config = OtpConfig::from_env();
    let lockout_config = LockoutConfig::from_env();
    let sms_config = SmsConfig::from_env();

    let redis = RedisClient::new(&cache_config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let otp_service = Arc::new(OtpService::new(
        Arc::new(RedisOtpStore::new(redis.clone())),
        Arc::new(SmsGateway::from_config(&sms_config)),
        Arc::new(RedisVerificationLog::new(redis.clone())),
        otp_config,
    ));
    let lockout_guard = Arc::new(LockoutGuard::new(
        Arc::new(RedisLockoutStore::new(redis)),
        lockout_config,
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(HttpIdentityProvider::new(&IdentityBackendConfig::from_env())),
        otp_service,
        lockout_guard.clone(),
    ));

    let state = web::Data::new(AppState::new(auth_service, lockout_guard));

    let bind_address = server_config.bind_address();
    info!("Binding to {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(create_cors())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(&bind_address)?;

    if server_config.workers > 0 {
        server = server.workers(server_config.workers);
    }

    server.run().await
}
