//! Shared application state

use std::sync::Arc;

use coop_core::services::auth::AuthService;
use coop_core::services::lockout::LockoutGuard;

/// Services shared across all request handlers
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub lockout_guard: Arc<LockoutGuard>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, lockout_guard: Arc<LockoutGuard>) -> Self {
        Self {
            auth_service,
            lockout_guard,
        }
    }
}
