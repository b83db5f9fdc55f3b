use crate::PermissionSet;

/// Identity the membership directory reports for an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryIdentity {
    /// Member identifier, if the directory reported one.
    pub subject_id: Option<String>,
    /// Permissions held by the member.
    pub permissions: PermissionSet,
}
