//! Shared primitives for all Rust crates in Toolgate.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Toolgate crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Gateway error taxonomy.
///
/// Every failure the gateway can produce resolves to one of these variants,
/// and every variant resolves to a well-defined HTTP response at the API edge.
#[derive(Debug, Error)]
pub enum AppError {
    /// The permission header was absent or empty.
    #[error("missing permission header")]
    MissingPermission,

    /// The requested permission is not on the operator whitelist.
    #[error("permission '{0}' isn't whitelisted, ask an admin to add it to the whitelist")]
    PermissionNotWhitelisted(String),

    /// The directory rejected the credentials or answered with an unexpected shape.
    #[error("Login failed: the membership directory rejected the credentials")]
    LoginFailed {
        /// Raw directory response body, kept for server-side diagnostics only.
        body: String,
    },

    /// The directory identity response carried no permission list.
    #[error("no permissions were reported for this member")]
    NoPermissionsReported,

    /// The directory identity response carried a permission field of the wrong shape.
    #[error("bad permissions received from the membership directory")]
    MalformedPermissions,

    /// The member authenticated but does not hold the requested permission.
    #[error("user does not have the '{0}' permission")]
    PermissionDenied(String),

    /// The directory omitted the member identifier and the policy forbids a fallback.
    #[error("the membership directory did not report a member id")]
    MissingSubjectId,

    /// No token cookie was presented.
    #[error("no session token presented")]
    MissingToken,

    /// The token signature does not match the server secret.
    #[error("token signature is invalid")]
    InvalidSignature,

    /// The token is past its expiry instant.
    #[error("token has expired")]
    TokenExpired,

    /// The token could not be decoded into a claim.
    #[error("token is malformed: {0}")]
    MalformedToken(String),

    /// The token grants a different permission than the one requested.
    #[error("token grants '{granted}' but '{requested}' was requested")]
    PermissionMismatch {
        /// Permission embedded in the token.
        granted: String,
        /// Permission requested by the current request.
        requested: String,
    },

    /// The directory could not be reached or timed out.
    #[error("membership directory unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable identifier for the error category.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingPermission => "MissingPermission",
            Self::PermissionNotWhitelisted(_) => "PermissionNotWhitelisted",
            Self::LoginFailed { .. } => "LoginFailed",
            Self::NoPermissionsReported => "NoPermissionsReported",
            Self::MalformedPermissions => "MalformedPermissions",
            Self::PermissionDenied(_) => "PermissionDenied",
            Self::MissingSubjectId => "MissingSubjectId",
            Self::MissingToken => "MissingToken",
            Self::InvalidSignature => "InvalidSignature",
            Self::TokenExpired => "Expired",
            Self::MalformedToken(_) => "Malformed",
            Self::PermissionMismatch { .. } => "PermissionMismatch",
            Self::UpstreamUnavailable(_) => "UpstreamUnavailable",
            Self::Validation(_) => "Validation",
            Self::Internal(_) => "Internal",
        }
    }

    /// Returns a message that is safe to show to end users.
    ///
    /// Upstream bodies and internal details stay out of it.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable(_) => {
                "the membership directory is unavailable, try again later".to_owned()
            }
            Self::Internal(_) => "internal error".to_owned(),
            other => other.to_string(),
        }
    }
}
