use std::sync::Arc;

use axum::http::HeaderName;
use toolgate_application::SessionService;
use toolgate_domain::PermissionWhitelist;

use crate::api_config::CookieSettings;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionService,
    pub whitelist: Arc<PermissionWhitelist>,
    pub permission_header: HeaderName,
    pub cookie: Arc<CookieSettings>,
    pub success_redirect: Arc<str>,
}
