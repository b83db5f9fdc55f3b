use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use toolgate_application::MissingSubjectPolicy;
use toolgate_core::AppError;
use toolgate_domain::PermissionWhitelist;
use toolgate_infrastructure::DirectoryEndpoints;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_DIRECTORY_LOGIN_URL: &str =
    "https://membership.vanhack.ca/services/web/AuthService1.svc/Login";
const DEFAULT_DIRECTORY_IDENTITY_URL: &str =
    "https://membership.vanhack.ca/services/web/AuthService1.svc/CurrentUser";
const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Attributes of the gateway token cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub domain: Option<String>,
    pub secure: bool,
}

#[derive(Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub cookie: CookieSettings,
    pub permission_header: HeaderName,
    pub whitelist: PermissionWhitelist,
    pub directory: DirectoryEndpoints,
    pub missing_subject_policy: MissingSubjectPolicy,
    pub success_redirect: String,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| -> Result<String, AppError> {
            let value = lookup(name)
                .ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{name} must not be empty")));
            }
            Ok(value)
        };
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} characters"
            )));
        }

        let cookie = CookieSettings {
            name: required("JWT_COOKIE_NAME")?.trim().to_owned(),
            domain: optional("COOKIE_DOMAIN").map(|domain| domain.trim().to_owned()),
            secure: optional("COOKIE_SECURE")
                .is_some_and(|value| value.trim().eq_ignore_ascii_case("true")),
        };

        let header_name = optional("PERMISSION_HEADER")
            .unwrap_or_else(|| "x-permission".to_owned())
            .trim()
            .to_ascii_lowercase();
        let permission_header = HeaderName::from_str(&header_name).map_err(|error| {
            AppError::Validation(format!("invalid PERMISSION_HEADER '{header_name}': {error}"))
        })?;

        let whitelist = match optional("PERMISSION_WHITELIST") {
            Some(list) => PermissionWhitelist::new(list.split(',').map(str::trim))?,
            None => PermissionWhitelist::default_tools(),
        };

        let directory = DirectoryEndpoints {
            login_url: parse_url(
                "DIRECTORY_LOGIN_URL",
                optional("DIRECTORY_LOGIN_URL").as_deref(),
                DEFAULT_DIRECTORY_LOGIN_URL,
            )?,
            identity_url: parse_url(
                "DIRECTORY_IDENTITY_URL",
                optional("DIRECTORY_IDENTITY_URL").as_deref(),
                DEFAULT_DIRECTORY_IDENTITY_URL,
            )?,
            timeout: Duration::from_secs(parse_number(
                "DIRECTORY_TIMEOUT_SECS",
                optional("DIRECTORY_TIMEOUT_SECS").as_deref(),
                10,
            )?),
        };
        if directory.timeout.is_zero() {
            return Err(AppError::Validation(
                "DIRECTORY_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let missing_subject_policy = if optional("DIRECTORY_REQUIRE_SUBJECT_ID")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
        {
            MissingSubjectPolicy::Reject
        } else {
            MissingSubjectPolicy::Fallback
        };

        let success_redirect = optional("LOGIN_SUCCESS_REDIRECT").unwrap_or_else(|| "/".to_owned());
        if !success_redirect.starts_with('/') {
            return Err(AppError::Validation(
                "LOGIN_SUCCESS_REDIRECT must be an absolute path".to_owned(),
            ));
        }

        let api_host = optional("API_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let api_port = parse_number("API_PORT", optional("API_PORT").as_deref(), 3000)?;

        Ok(Self {
            jwt_secret,
            cookie,
            permission_header,
            whitelist,
            directory,
            missing_subject_policy,
            success_redirect,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_url(name: &str, value: Option<&str>, default: &str) -> Result<Url, AppError> {
    let value = value.unwrap_or(default).trim();
    let url = Url::parse(value)
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::Validation(format!(
            "{name} must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

fn parse_number<T>(name: &str, value: Option<&str>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
    })
}
