//! Permission types and the operator whitelist.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use toolgate_core::{AppError, AppResult};

/// Tool permissions gatewayed by a default makerspace deployment.
pub const DEFAULT_PERMISSION_WHITELIST: &[&str] = &[
    "laser",
    "3d-printer",
    "tablesaw",
    "tool:wood:jointer-planer",
    "tool:wood:cnc",
    "tool:metal:lathe",
    "tool:metal:cnc",
    "tool:metal:mill",
];

/// A permission requested by the fronting proxy that has passed the whitelist.
///
/// The only constructor is [`PermissionWhitelist::admit`], so holding a value
/// of this type proves the whitelist check ran.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestedPermission(String);

impl RequestedPermission {
    /// Returns the permission string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RequestedPermission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Operator-curated set of permissions the gateway is willing to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWhitelist {
    permissions: BTreeSet<String>,
}

impl PermissionWhitelist {
    /// Builds a whitelist, rejecting empty lists and blank entries.
    pub fn new<I, S>(permissions: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected = BTreeSet::new();
        for permission in permissions {
            let permission = permission.into();
            let trimmed = permission.trim();
            if trimmed.is_empty() {
                return Err(AppError::Validation(
                    "permission whitelist entries must not be empty".to_owned(),
                ));
            }
            collected.insert(trimmed.to_owned());
        }

        if collected.is_empty() {
            return Err(AppError::Validation(
                "permission whitelist must contain at least one permission".to_owned(),
            ));
        }

        Ok(Self {
            permissions: collected,
        })
    }

    /// Returns the default tool whitelist.
    #[must_use]
    pub fn default_tools() -> Self {
        Self {
            permissions: DEFAULT_PERMISSION_WHITELIST
                .iter()
                .map(|permission| (*permission).to_owned())
                .collect(),
        }
    }

    /// Admits a non-empty permission value if it is whitelisted.
    pub fn admit(&self, value: &str) -> AppResult<RequestedPermission> {
        if value.is_empty() {
            return Err(AppError::MissingPermission);
        }

        if !self.permissions.contains(value) {
            return Err(AppError::PermissionNotWhitelisted(value.to_owned()));
        }

        Ok(RequestedPermission(value.to_owned()))
    }

    /// Returns whether the whitelist contains `value`.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.permissions.contains(value)
    }

    /// Iterates the whitelisted permissions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }
}

/// Permissions the membership directory reports for one member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(Vec<String>);

impl PermissionSet {
    /// Creates a set from directory-reported values. Duplicates are kept as reported.
    #[must_use]
    pub fn new(permissions: Vec<String>) -> Self {
        Self(permissions)
    }

    /// Returns whether the set grants the requested permission.
    #[must_use]
    pub fn grants(&self, permission: &RequestedPermission) -> bool {
        self.0.iter().any(|granted| granted == permission.as_str())
    }

    /// Number of reported entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the directory reported no permissions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
