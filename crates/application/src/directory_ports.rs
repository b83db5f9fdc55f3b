use async_trait::async_trait;
use toolgate_core::AppResult;
use toolgate_domain::{Credentials, DirectoryIdentity, UpstreamSession};

/// Port for the external membership directory.
///
/// One login attempt is one `login` followed by one `fetch_identity` with the
/// session it returned. Implementations make a single attempt per call.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Exchanges credentials for a directory session.
    async fn login(&self, credentials: &Credentials) -> AppResult<UpstreamSession>;

    /// Fetches the identity and permission set bound to a directory session.
    async fn fetch_identity(&self, session: &UpstreamSession) -> AppResult<DirectoryIdentity>;
}
