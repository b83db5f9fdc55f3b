use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use toolgate_core::AppError;

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
    code: &'static str,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::MissingPermission | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PermissionNotWhitelisted(_) | AppError::PermissionDenied(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::LoginFailed { .. }
            | AppError::MissingToken
            | AppError::InvalidSignature
            | AppError::TokenExpired
            | AppError::MalformedToken(_)
            | AppError::PermissionMismatch { .. } => StatusCode::UNAUTHORIZED,
            AppError::NoPermissionsReported
            | AppError::MalformedPermissions
            | AppError::MissingSubjectId
            | AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = Json(ErrorResponse {
            message: self.0.user_message(),
            code: self.0.code(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
