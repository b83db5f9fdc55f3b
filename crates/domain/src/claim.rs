//! Signed claim carried by the gateway cookie.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// How long an issued claim stays valid. There is no refresh.
pub const CLAIM_LIFETIME_HOURS: i64 = 24;

/// Subject recorded when the directory omits the member id.
pub const UNKNOWN_SUBJECT: &str = "unknown";

/// Facts asserted by a gateway token.
///
/// Field names on the wire match cookies issued by earlier deployments.
/// Those deployments wrote `userId` as a JSON number, so both forms are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedClaim {
    /// Member identifier reported by the directory.
    #[serde(rename = "userId", deserialize_with = "subject_id_from_number_or_string")]
    pub subject_id: String,
    /// The single permission this claim grants.
    #[serde(rename = "permission")]
    pub granted_permission: String,
    /// Issuance instant.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,
    /// Expiry instant; the claim is invalid from this instant on.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl GrantedClaim {
    /// Builds a claim issued at `issued_at` that expires one lifetime later.
    ///
    /// Sub-second precision is dropped so the claim survives serialization unchanged.
    #[must_use]
    pub fn issue(
        subject_id: impl Into<String>,
        granted_permission: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let issued_at = DateTime::<Utc>::from_timestamp(issued_at.timestamp(), 0)
            .unwrap_or(issued_at);
        Self {
            subject_id: subject_id.into(),
            granted_permission: granted_permission.into(),
            issued_at,
            expires_at: issued_at + Duration::hours(CLAIM_LIFETIME_HOURS),
        }
    }

    /// Returns whether the claim has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireSubjectId {
    Integer(i64),
    Text(String),
}

fn subject_id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match WireSubjectId::deserialize(deserializer)? {
        WireSubjectId::Integer(id) => id.to_string(),
        WireSubjectId::Text(id) => id,
    })
}

/// Compact signed token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    /// Wraps an encoded token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SignedToken> for String {
    fn from(value: SignedToken) -> Self {
        value.0
    }
}
