use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::Value;
use toolgate_application::DirectoryClient;
use toolgate_core::{AppError, AppResult};
use toolgate_domain::{Credentials, DirectoryIdentity, PermissionSet, UpstreamSession};
use tracing::debug;
use url::Url;

/// Literal body the directory login endpoint returns on success, JSON quotes included.
pub const LOGIN_ACCEPTED_BODY: &str = "\"Access Granted\"";

/// Directory endpoints and call budget.
#[derive(Debug, Clone)]
pub struct DirectoryEndpoints {
    /// Credential exchange endpoint.
    pub login_url: Url,
    /// Current-member endpoint returning id and permissions.
    pub identity_url: Url,
    /// Upper bound for each outbound call.
    pub timeout: Duration,
}

/// reqwest-based client for the membership directory.
pub struct HttpDirectoryClient {
    http_client: reqwest::Client,
    endpoints: DirectoryEndpoints,
}

impl HttpDirectoryClient {
    /// Creates a directory client with its own connection pool.
    pub fn new(endpoints: DirectoryEndpoints) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(endpoints.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build directory http client: {error}"))
            })?;

        Ok(Self {
            http_client,
            endpoints,
        })
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<UpstreamSession> {
        let response = self
            .http_client
            .post(self.endpoints.login_url.clone())
            .json(credentials)
            .send()
            .await
            .map_err(|error| transport_error("login", &error))?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let body = response
            .text()
            .await
            .map_err(|error| transport_error("login", &error))?;

        debug!(%status, cookies = set_cookies.len(), "directory login answered");
        evaluate_login_response(status, &body, set_cookies.iter().map(String::as_str))
    }

    async fn fetch_identity(&self, session: &UpstreamSession) -> AppResult<DirectoryIdentity> {
        let response = self
            .http_client
            .get(self.endpoints.identity_url.clone())
            .header(COOKIE, session.cookie_header())
            .send()
            .await
            .map_err(|error| transport_error("identity", &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "identity endpoint answered with status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|error| transport_error("identity", &error))?;

        parse_identity(&body)
    }
}

/// Applies the directory's login success rule.
///
/// Success requires status 200, the exact acknowledgement body and at least one
/// session cookie. The returned session replays every cookie's `name=value` pair.
pub fn evaluate_login_response<'a>(
    status: StatusCode,
    body: &str,
    set_cookies: impl IntoIterator<Item = &'a str>,
) -> AppResult<UpstreamSession> {
    let cookie_pairs = set_cookies
        .into_iter()
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>();

    if status != StatusCode::OK || body != LOGIN_ACCEPTED_BODY || cookie_pairs.is_empty() {
        return Err(AppError::LoginFailed {
            body: body.to_owned(),
        });
    }

    Ok(UpstreamSession::new(cookie_pairs.join("; ")))
}

/// Parses the identity endpoint body into a member identity.
pub fn parse_identity(body: &str) -> AppResult<DirectoryIdentity> {
    let value: Value = serde_json::from_str(body).map_err(|_| AppError::MalformedPermissions)?;

    let permissions = match value.get("permissions") {
        None | Some(Value::Null) => return Err(AppError::NoPermissionsReported),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| entry.as_str().map(str::to_owned))
            .collect::<Option<Vec<_>>>()
            .ok_or(AppError::MalformedPermissions)?,
        Some(_) => return Err(AppError::MalformedPermissions),
    };

    let subject_id = match value.get("id") {
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.clone()),
        _ => None,
    };

    Ok(DirectoryIdentity {
        subject_id,
        permissions: PermissionSet::new(permissions),
    })
}

fn transport_error(call: &str, error: &reqwest::Error) -> AppError {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };

    // reqwest errors carry the URL only, never the request body.
    AppError::UpstreamUnavailable(format!("directory {call} call {kind}: {error}"))
}

#[cfg(test)]
mod tests;
