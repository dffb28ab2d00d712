mod organization_role;
mod permission;
mod session_credential;
mod workspace;
mod workspace_role;
