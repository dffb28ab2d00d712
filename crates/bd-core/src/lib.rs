pub mod directory;
pub mod error;
pub mod models;

pub use directory::{ContextSwitcher, DirectoryError, DirectoryResult, TenantDirectory};
pub use error::{CoreError, Result};
pub use models::organization::Organization;
pub use models::organization_role::OrganizationRole;
pub use models::permission::Permission;
pub use models::permission_set::{PermissionSet, derive_organization_permissions, derive_permissions};
pub use models::session_credential::SessionCredential;
pub use models::user::User;
pub use models::workspace::Workspace;
pub use models::workspace_role::WorkspaceRole;

#[cfg(test)]
mod tests;
