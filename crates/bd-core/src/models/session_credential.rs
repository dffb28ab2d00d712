use crate::{OrganizationRole, WorkspaceRole};

use serde::{Deserialize, Serialize};

/// Session credential issued by the context-switch endpoint.
///
/// Matches the switch response body. The roles are optional; when present
/// they override whatever the directory listed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    #[serde(rename = "credential")]
    pub token: String,
    pub organization_id: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub organization_role: Option<OrganizationRole>,
    #[serde(default)]
    pub workspace_role: Option<WorkspaceRole>,
}

impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("token", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("workspace_id", &self.workspace_id)
            .field("organization_role", &self.organization_role)
            .field("workspace_role", &self.workspace_role)
            .finish()
    }
}
