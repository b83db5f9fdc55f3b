use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use toolgate_application::DirectoryClient;
use toolgate_core::AppError;
use toolgate_domain::{Credentials, PermissionWhitelist, UpstreamSession};
use url::Url;

use super::{
    DirectoryEndpoints, HttpDirectoryClient, LOGIN_ACCEPTED_BODY, evaluate_login_response,
    parse_identity,
};

const SESSION_COOKIE: &str = "ASP.NET_SessionId=abc123";

async fn directory_login(Json(body): Json<Value>) -> Response {
    let accepted = body.get("username") == Some(&json!("maker"))
        && body.get("password") == Some(&json!("hunter22"));

    if accepted {
        (
            StatusCode::OK,
            [(SET_COOKIE, format!("{SESSION_COOKIE}; path=/; HttpOnly"))],
            LOGIN_ACCEPTED_BODY,
        )
            .into_response()
    } else {
        (StatusCode::OK, "\"Access Denied\"").into_response()
    }
}

async fn directory_current_user(headers: HeaderMap) -> Response {
    let cookie = headers.get(COOKIE).and_then(|value| value.to_str().ok());
    if cookie != Some(SESSION_COOKIE) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    Json(json!({
        "id": 809,
        "permissions": ["door", "vetted", "laser", "grant:laser", "tablesaw", "user"],
    }))
    .into_response()
}

async fn slow_login() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    LOGIN_ACCEPTED_BODY
}

async fn spawn_directory() -> SocketAddr {
    let router = Router::new()
        .route("/Login", post(directory_login))
        .route("/CurrentUser", get(directory_current_user))
        .route("/SlowLogin", post(slow_login));

    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind fake directory: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read fake directory address: {error}"),
    };

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    address
}

fn client_for(address: SocketAddr, login_path: &str, timeout: Duration) -> HttpDirectoryClient {
    let url = |path: &str| {
        Url::parse(&format!("http://{address}{path}"))
            .unwrap_or_else(|error| panic!("invalid test url: {error}"))
    };

    HttpDirectoryClient::new(DirectoryEndpoints {
        login_url: url(login_path),
        identity_url: url("/CurrentUser"),
        timeout,
    })
    .unwrap_or_else(|error| panic!("failed to build client: {error}"))
}

fn credentials(password: &str) -> Credentials {
    Credentials::new("maker", password).unwrap_or_else(|_| panic!("test"))
}

#[test]
fn login_requires_status_body_and_cookie() {
    let cookies = ["ASP.NET_SessionId=abc123; path=/; HttpOnly"];

    let session = evaluate_login_response(StatusCode::OK, LOGIN_ACCEPTED_BODY, cookies)
        .unwrap_or_else(|error| panic!("unexpected rejection: {error}"));
    assert_eq!(session.cookie_header(), "ASP.NET_SessionId=abc123");

    assert!(matches!(
        evaluate_login_response(StatusCode::FORBIDDEN, LOGIN_ACCEPTED_BODY, cookies),
        Err(AppError::LoginFailed { .. })
    ));
    assert!(matches!(
        evaluate_login_response(StatusCode::OK, "Access Granted", cookies),
        Err(AppError::LoginFailed { .. })
    ));
    assert!(matches!(
        evaluate_login_response(StatusCode::OK, LOGIN_ACCEPTED_BODY, std::iter::empty()),
        Err(AppError::LoginFailed { .. })
    ));
}

#[test]
fn login_failure_keeps_directory_body_for_diagnostics() {
    match evaluate_login_response(StatusCode::OK, "\"Access Denied\"", ["a=b"]) {
        Err(AppError::LoginFailed { body }) => assert_eq!(body, "\"Access Denied\""),
        other => panic!("unexpected login evaluation: {other:?}"),
    }
}

#[test]
fn every_session_cookie_is_replayed() {
    let session = evaluate_login_response(
        StatusCode::OK,
        LOGIN_ACCEPTED_BODY,
        ["first=1; path=/", "second=2; HttpOnly"],
    )
    .unwrap_or_else(|error| panic!("unexpected rejection: {error}"));

    assert_eq!(session.cookie_header(), "first=1; second=2");
}

#[test]
fn identity_parsing_follows_directory_shapes() {
    let identity = parse_identity(r#"{"id":809,"permissions":["door","laser","door"]}"#)
        .unwrap_or_else(|error| panic!("unexpected parse failure: {error}"));
    assert_eq!(identity.subject_id.as_deref(), Some("809"));
    assert_eq!(identity.permissions.len(), 3);

    let identity = parse_identity(r#"{"permissions":[]}"#)
        .unwrap_or_else(|error| panic!("unexpected parse failure: {error}"));
    assert_eq!(identity.subject_id, None);
    assert!(identity.permissions.is_empty());

    assert!(matches!(
        parse_identity(r#"{"id":809}"#),
        Err(AppError::NoPermissionsReported)
    ));
    assert!(matches!(
        parse_identity(r#"{"id":809,"permissions":null}"#),
        Err(AppError::NoPermissionsReported)
    ));
    assert!(matches!(
        parse_identity(r#"{"id":809,"permissions":"laser"}"#),
        Err(AppError::MalformedPermissions)
    ));
    assert!(matches!(
        parse_identity(r#"{"id":809,"permissions":["laser",7]}"#),
        Err(AppError::MalformedPermissions)
    ));
    assert!(matches!(
        parse_identity("<html>maintenance</html>"),
        Err(AppError::MalformedPermissions)
    ));
}

#[tokio::test]
async fn login_and_identity_round_trip_against_directory() {
    let address = spawn_directory().await;
    let client = client_for(address, "/Login", Duration::from_secs(5));

    let session = client
        .login(&credentials("hunter22"))
        .await
        .unwrap_or_else(|error| panic!("login failed: {error}"));
    let identity = client
        .fetch_identity(&session)
        .await
        .unwrap_or_else(|error| panic!("identity failed: {error}"));

    let laser = PermissionWhitelist::default_tools()
        .admit("laser")
        .unwrap_or_else(|_| panic!("test"));
    assert_eq!(identity.subject_id.as_deref(), Some("809"));
    assert!(identity.permissions.grants(&laser));
}

#[tokio::test]
async fn wrong_password_is_login_failed() {
    let address = spawn_directory().await;
    let client = client_for(address, "/Login", Duration::from_secs(5));

    let result = client.login(&credentials("wrong-password")).await;

    assert!(matches!(result, Err(AppError::LoginFailed { .. })));
}

#[tokio::test]
async fn rejected_session_is_upstream_unavailable() {
    let address = spawn_directory().await;
    let client = client_for(address, "/Login", Duration::from_secs(5));

    let result = client
        .fetch_identity(&UpstreamSession::new("ASP.NET_SessionId=stale"))
        .await;

    assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn stalled_directory_times_out() {
    let address = spawn_directory().await;
    let client = client_for(address, "/SlowLogin", Duration::from_millis(100));

    let result = client.login(&credentials("hunter22")).await;

    assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn unreachable_directory_is_upstream_unavailable() {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind probe listener: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read probe address: {error}"),
    };
    drop(listener);

    let client = client_for(address, "/Login", Duration::from_secs(2));
    let result = client.login(&credentials("hunter22")).await;

    assert!(matches!(result, Err(AppError::UpstreamUnavailable(_))));
}
