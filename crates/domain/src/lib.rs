//! Domain types and invariants for the permission gateway.

#![forbid(unsafe_code)]

mod claim;
mod credentials;
mod directory;
mod permission;

pub use claim::{CLAIM_LIFETIME_HOURS, GrantedClaim, SignedToken, UNKNOWN_SUBJECT};
pub use credentials::{Credentials, UpstreamSession};
pub use directory::DirectoryIdentity;
pub use permission::{
    DEFAULT_PERMISSION_WHITELIST, PermissionSet, PermissionWhitelist, RequestedPermission,
};
