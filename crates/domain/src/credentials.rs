//! Login credentials and the directory session artifact.
//!
//! Neither type is ever persisted. Both redact their secret parts in `Debug`
//! output so they cannot leak through tracing fields or error chains.

use std::fmt::{Debug, Formatter};

use serde::Serialize;
use toolgate_core::{AppResult, NonEmptyString};

/// Username and password supplied by the member for one login attempt.
#[derive(Clone, Serialize)]
pub struct Credentials {
    username: NonEmptyString,
    password: NonEmptyString,
}

impl Credentials {
    /// Validates that both parts are non-empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            username: NonEmptyString::new(username)?,
            password: NonEmptyString::new(password)?,
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the plaintext password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username.as_str())
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque cookie string returned by the directory login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamSession(String);

impl UpstreamSession {
    /// Wraps the cookie header value to replay against the identity endpoint.
    #[must_use]
    pub fn new(cookie: impl Into<String>) -> Self {
        Self(cookie.into())
    }

    /// Returns the cookie header value.
    #[must_use]
    pub fn cookie_header(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for UpstreamSession {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("UpstreamSession(<redacted>)")
    }
}
