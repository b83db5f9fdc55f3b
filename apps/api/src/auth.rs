//! Gateway login, forward-auth check and logout handlers.

mod login_page;
mod session_cookie;

use axum::Json;
use axum::extract::{Extension, Form, FromRequest, Query, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use toolgate_application::LoginOutcome;
use toolgate_core::AppError;
use toolgate_domain::{Credentials, RequestedPermission};
use tracing::debug;
use url::form_urlencoded;

use crate::dto::{LoginPageQuery, LoginRequest};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

/// GET /login - Login form for the requested permission.
pub async fn login_page_handler(
    Extension(requested): Extension<RequestedPermission>,
    Query(query): Query<LoginPageQuery>,
) -> Html<String> {
    Html(login_page::render(query.error.as_deref(), &requested))
}

/// POST /login - Delegates credentials to the directory and issues the gateway cookie.
pub async fn login_handler(
    State(state): State<AppState>,
    Extension(requested): Extension<RequestedPermission>,
    jar: CookieJar,
    LoginSubmission(payload): LoginSubmission,
) -> ApiResult<Response> {
    let credentials = match (payload.username, payload.password) {
        (Some(username), Some(password)) => {
            Credentials::new(username, password).map_err(|_| {
                AppError::Validation("username and password must not be empty".to_owned())
            })?
        }
        _ => {
            return Err(
                AppError::Validation("username and password are required".to_owned()).into(),
            );
        }
    };

    let response = match state.session_service.login(&requested, &credentials).await {
        LoginOutcome::Minted { token, .. } => (
            jar.add(session_cookie::issued(&state.cookie, token)),
            Redirect::to(&state.success_redirect),
        )
            .into_response(),
        LoginOutcome::Rejected(error) => {
            Redirect::to(&login_error_location(&error)).into_response()
        }
    };

    Ok(response)
}

/// GET /login/check - Forward-auth oracle for the fronting proxy.
pub async fn check_handler(
    State(state): State<AppState>,
    Extension(requested): Extension<RequestedPermission>,
    jar: CookieJar,
) -> Response {
    let token = jar.get(&state.cookie.name).map(|cookie| cookie.value());

    match state.session_service.check(&requested, token) {
        Ok(_) => StatusCode::OK.into_response(),
        Err(error) => {
            debug!(permission = %requested, code = error.code(), "gateway check refused");
            (StatusCode::UNAUTHORIZED, error.to_string()).into_response()
        }
    }
}

/// GET /login/out - Overwrites the gateway cookie with an expired one.
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    (
        jar.add(session_cookie::cleared(&state.cookie)),
        Redirect::to(LOGIN_PATH),
    )
}

fn login_error_location(error: &AppError) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("error", &error.user_message())
        .append_pair("code", error.code())
        .finish();

    format!("{LOGIN_PATH}?{query}")
}

/// Login body accepted either form-encoded or as JSON.
pub struct LoginSubmission(pub LoginRequest);

impl<S> FromRequest<S> for LoginSubmission
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let payload = if is_json {
            Json::<LoginRequest>::from_request(request, state)
                .await
                .map(|Json(payload)| payload)
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?
        } else {
            Form::<LoginRequest>::from_request(request, state)
                .await
                .map(|Form(payload)| payload)
                .map_err(|rejection| AppError::Validation(rejection.body_text()))?
        };

        Ok(Self(payload))
    }
}
