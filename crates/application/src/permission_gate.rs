//! Whitelist gate for the permission header injected by the fronting proxy.

use toolgate_core::{AppError, AppResult};
use toolgate_domain::{PermissionWhitelist, RequestedPermission};

/// Validates a raw permission header value against the whitelist.
///
/// `None` and whitespace-only values are treated as a missing header. Anything
/// else is compared verbatim. Callers holding a repeated header pass only its
/// first value.
pub fn validate(
    header_value: Option<&str>,
    whitelist: &PermissionWhitelist,
) -> AppResult<RequestedPermission> {
    let value = header_value.unwrap_or_default();
    if value.trim().is_empty() {
        return Err(AppError::MissingPermission);
    }

    whitelist.admit(value)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use toolgate_domain::DEFAULT_PERMISSION_WHITELIST;

    use super::*;

    #[test]
    fn absent_header_is_missing_permission() {
        let whitelist = PermissionWhitelist::default_tools();
        assert!(matches!(
            validate(None, &whitelist),
            Err(AppError::MissingPermission)
        ));
        assert!(matches!(
            validate(Some("   "), &whitelist),
            Err(AppError::MissingPermission)
        ));
    }

    #[test]
    fn whitelisted_header_is_admitted() {
        let whitelist = PermissionWhitelist::default_tools();
        let permission = validate(Some("tool:metal:lathe"), &whitelist)
            .unwrap_or_else(|error| panic!("unexpected rejection: {error}"));
        assert_eq!(permission.as_str(), "tool:metal:lathe");
    }

    #[test]
    fn non_whitelisted_header_is_rejected_with_value() {
        let whitelist = PermissionWhitelist::default_tools();
        match validate(Some("nonexistent-tool"), &whitelist) {
            Err(AppError::PermissionNotWhitelisted(value)) => {
                assert_eq!(value, "nonexistent-tool");
            }
            other => panic!("unexpected gate result: {other:?}"),
        }
    }

    #[test]
    fn padded_header_is_not_whitelisted() {
        let whitelist = PermissionWhitelist::default_tools();
        match validate(Some(" laser"), &whitelist) {
            Err(AppError::PermissionNotWhitelisted(value)) => assert_eq!(value, " laser"),
            other => panic!("unexpected gate result: {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn gate_admits_exactly_the_whitelist(value in "[a-z0-9:-]{0,24}") {
            let whitelist = PermissionWhitelist::default_tools();
            let admitted = validate(Some(&value), &whitelist).is_ok();
            prop_assert_eq!(admitted, DEFAULT_PERMISSION_WHITELIST.contains(&value.as_str()));
        }
    }
}
