pub mod organization;
pub mod organization_role;
pub mod permission;
pub mod permission_set;
pub mod session_credential;
pub mod user;
pub mod workspace;
pub mod workspace_role;
