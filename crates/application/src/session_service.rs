//! Session orchestrator: drives directory login, permission membership and
//! token issuance, and answers token checks for the fronting proxy.
//!
//! The service holds no per-request state. Collaborators are injected at
//! construction so tests can substitute fakes.

mod check;
mod login;

use std::sync::Arc;

use toolgate_core::{AppError, AppResult};
use toolgate_domain::{
    Credentials, GrantedClaim, RequestedPermission, SignedToken, UNKNOWN_SUBJECT,
};

use crate::{DirectoryClient, TokenCodec};

/// What to do when the directory omits the member id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingSubjectPolicy {
    /// Mint for [`UNKNOWN_SUBJECT`] and warn operators.
    #[default]
    Fallback,
    /// Fail the login with [`AppError::MissingSubjectId`].
    Reject,
}

/// Terminal state of one login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials and permission checked out; a token was issued.
    Minted {
        /// Token to hand to the client.
        token: SignedToken,
        /// Claim embedded in the token.
        claim: GrantedClaim,
    },
    /// The attempt failed at some step.
    Rejected(AppError),
}

/// Application service for gateway logins and token checks.
#[derive(Clone)]
pub struct SessionService {
    directory: Arc<dyn DirectoryClient>,
    token_codec: Arc<dyn TokenCodec>,
    missing_subject_policy: MissingSubjectPolicy,
}

impl SessionService {
    /// Creates a new session service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn DirectoryClient>,
        token_codec: Arc<dyn TokenCodec>,
        missing_subject_policy: MissingSubjectPolicy,
    ) -> Self {
        Self {
            directory,
            token_codec,
            missing_subject_policy,
        }
    }
}
