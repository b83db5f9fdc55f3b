use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::auth::LOGIN_PATH;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    // Everything that reads the requested permission sits behind the gate.
    let gated_routes = Router::new()
        .route(
            LOGIN_PATH,
            get(auth::login_page_handler).post(auth::login_handler),
        )
        .route("/login/check", get(auth::check_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_whitelisted_permission,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/login/out", get(auth::logout_handler))
        .merge(gated_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
