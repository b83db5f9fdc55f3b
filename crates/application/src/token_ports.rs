use toolgate_core::AppResult;
use toolgate_domain::{GrantedClaim, RequestedPermission, SignedToken};

/// Port for signing and verifying gateway claims.
///
/// Verification must depend only on the token, the server secret and the
/// current time.
pub trait TokenCodec: Send + Sync {
    /// Mints a token granting `permission` to `subject_id` for one claim lifetime.
    fn mint(
        &self,
        subject_id: &str,
        permission: &RequestedPermission,
    ) -> AppResult<(SignedToken, GrantedClaim)>;

    /// Verifies a presented token and returns its claim.
    fn verify(&self, token: &str) -> AppResult<GrantedClaim>;
}
