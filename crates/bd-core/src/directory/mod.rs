//! Collaborators the tenancy context consumes but does not implement.

mod error;

pub use error::{DirectoryError, Result as DirectoryResult};

use crate::{Organization, SessionCredential, Workspace};

use async_trait::async_trait;

/// Lists the tenants a user can reach. Both calls are idempotent reads.
///
/// Implementations must return entries in the order the backend produced
/// them; callers rely on that order for "first entry" fallbacks.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn list_organizations(&self, user_id: &str) -> DirectoryResult<Vec<Organization>>;

    async fn list_workspaces(&self, organization_id: &str) -> DirectoryResult<Vec<Workspace>>;
}

/// Exchanges the held session credential for one scoped to a new context.
///
/// The switch calls only return the issued credential. Implementations keep
/// sending their current credential until the caller hands one back through
/// [`ContextSwitcher::adopt_credential`], so a result the caller discards
/// never reaches later requests.
#[async_trait]
pub trait ContextSwitcher: Send + Sync {
    async fn switch_organization(
        &self,
        organization_id: &str,
        workspace_id: Option<&str>,
    ) -> DirectoryResult<SessionCredential>;

    async fn switch_workspace(&self, workspace_id: &str) -> DirectoryResult<SessionCredential>;

    /// Use `credential` for subsequent requests. `None` drops any adopted
    /// credential and returns to the one held before the first switch.
    fn adopt_credential(&self, credential: Option<&SessionCredential>);
}
