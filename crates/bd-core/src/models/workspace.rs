use crate::WorkspaceRole;

use serde::{Deserialize, Serialize};

/// Resource-scoping unit nested under exactly one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub organization_id: String,
    pub role: WorkspaceRole,
    #[serde(default)]
    pub is_default: bool,
}

impl Workspace {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organization_id: impl Into<String>,
        role: WorkspaceRole,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            organization_id: organization_id.into(),
            role,
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn belongs_to(&self, organization_id: &str) -> bool {
        self.organization_id == organization_id
    }
}
