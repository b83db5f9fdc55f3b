use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use toolgate_application::permission_gate;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

/// Rejects requests whose permission header is missing or not whitelisted.
///
/// On success the validated `RequestedPermission` is handed to the handler
/// through the request extensions.
pub async fn require_whitelisted_permission(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let header_value = request
        .headers()
        .get_all(&state.permission_header)
        .iter()
        .next()
        .and_then(|value| value.to_str().ok());

    let requested = permission_gate::validate(header_value, &state.whitelist).inspect_err(
        |error| {
            warn!(
                path = %request.uri().path(),
                code = error.code(),
                error = %error,
                "permission gate rejected request"
            );
        },
    )?;

    request.extensions_mut().insert(requested);
    Ok(next.run(request).await)
}
