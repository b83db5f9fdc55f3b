//! Toolgate API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use toolgate_application::SessionService;
use toolgate_core::AppError;
use toolgate_infrastructure::{HttpDirectoryClient, JwtTokenCodec};
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let directory = Arc::new(HttpDirectoryClient::new(config.directory.clone())?);
    let token_codec = Arc::new(JwtTokenCodec::new(config.jwt_secret.as_bytes())?);
    let session_service =
        SessionService::new(directory, token_codec, config.missing_subject_policy);

    info!(
        whitelist = %config.whitelist.iter().collect::<Vec<_>>().join(","),
        header = %config.permission_header,
        directory = %config.directory.login_url,
        "gateway configured"
    );

    let address = config.socket_address()?;
    let app_state = AppState {
        session_service,
        whitelist: Arc::new(config.whitelist),
        permission_header: config.permission_header,
        cookie: Arc::new(config.cookie),
        success_redirect: Arc::from(config.success_redirect),
    };
    let app = api_router::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "toolgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
