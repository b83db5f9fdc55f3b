use tracing::debug;

use super::*;

impl SessionService {
    /// Answers whether a presented token authorizes the requested permission.
    ///
    /// Makes no directory calls and never mints.
    pub fn check(
        &self,
        requested: &RequestedPermission,
        token: Option<&str>,
    ) -> AppResult<GrantedClaim> {
        let token = token
            .filter(|token| !token.is_empty())
            .ok_or(AppError::MissingToken)?;
        let claim = self.token_codec.verify(token)?;

        if claim.granted_permission != requested.as_str() {
            debug!(
                granted = %claim.granted_permission,
                requested = %requested,
                "token presented for a different permission"
            );
            return Err(AppError::PermissionMismatch {
                granted: claim.granted_permission,
                requested: requested.as_str().to_owned(),
            });
        }

        Ok(claim)
    }
}
