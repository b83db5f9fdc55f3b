use tracing::{debug, info, warn};

use super::*;

/// Steps of one login attempt, recorded on debug traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginState {
    AwaitingDirectoryLogin,
    AwaitingPermissionFetch,
    PermissionCheck,
    Minted,
    Rejected,
}

impl SessionService {
    /// Runs one login attempt for an already whitelisted permission.
    ///
    /// Every failure becomes [`LoginOutcome::Rejected`]; nothing here is retried.
    pub async fn login(
        &self,
        requested: &RequestedPermission,
        credentials: &Credentials,
    ) -> LoginOutcome {
        match self.run_login(requested, credentials).await {
            Ok((token, claim)) => {
                debug!(state = ?LoginState::Minted, permission = %requested);
                info!(
                    permission = %requested,
                    subject = %claim.subject_id,
                    "gateway token issued"
                );
                LoginOutcome::Minted { token, claim }
            }
            Err(error) => {
                debug!(state = ?LoginState::Rejected, permission = %requested);
                match &error {
                    AppError::LoginFailed { body } => warn!(
                        permission = %requested,
                        code = error.code(),
                        directory_body = %body,
                        "login rejected by membership directory"
                    ),
                    _ => info!(
                        permission = %requested,
                        code = error.code(),
                        error = %error,
                        "login rejected"
                    ),
                }
                LoginOutcome::Rejected(error)
            }
        }
    }

    async fn run_login(
        &self,
        requested: &RequestedPermission,
        credentials: &Credentials,
    ) -> AppResult<(SignedToken, GrantedClaim)> {
        debug!(state = ?LoginState::AwaitingDirectoryLogin, permission = %requested);
        let session = self.directory.login(credentials).await?;

        debug!(state = ?LoginState::AwaitingPermissionFetch, permission = %requested);
        let identity = self.directory.fetch_identity(&session).await?;
        drop(session);

        debug!(
            state = ?LoginState::PermissionCheck,
            permission = %requested,
            reported = identity.permissions.len()
        );
        if !identity.permissions.grants(requested) {
            return Err(AppError::PermissionDenied(requested.as_str().to_owned()));
        }

        let subject_id = match identity.subject_id {
            Some(subject_id) => subject_id,
            None => match self.missing_subject_policy {
                MissingSubjectPolicy::Fallback => {
                    warn!(
                        permission = %requested,
                        fallback = UNKNOWN_SUBJECT,
                        "membership directory reported no member id, issuing token for fallback subject"
                    );
                    UNKNOWN_SUBJECT.to_owned()
                }
                MissingSubjectPolicy::Reject => return Err(AppError::MissingSubjectId),
            },
        };

        self.token_codec.mint(&subject_id, requested)
    }
}
