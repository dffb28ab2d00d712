use crate::{CoreError, Permission, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// The caller's role within a single workspace, ordered `Viewer < Editor < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    Viewer,
    Editor,
    Admin,
}

const VIEWER_GRANTS: &[Permission] = &[
    Permission::WorkspaceRead,
    Permission::ChatbotRead,
    Permission::ChatflowRead,
    Permission::KnowledgeBaseRead,
];

const EDITOR_GRANTS: &[Permission] = &[
    Permission::ChatbotCreate,
    Permission::ChatbotUpdate,
    Permission::ChatflowCreate,
    Permission::ChatflowUpdate,
    Permission::KnowledgeBaseWrite,
];

const ADMIN_GRANTS: &[Permission] = &[
    Permission::WorkspaceWrite,
    Permission::WorkspaceManageMembers,
    Permission::ChatbotDelete,
    Permission::ChatflowDelete,
    Permission::KnowledgeBaseDelete,
];

impl WorkspaceRole {
    pub const ALL: &'static [WorkspaceRole] = &[Self::Viewer, Self::Editor, Self::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    fn level_grants(&self) -> &'static [Permission] {
        match self {
            Self::Viewer => VIEWER_GRANTS,
            Self::Editor => EDITOR_GRANTS,
            Self::Admin => ADMIN_GRANTS,
        }
    }

    /// Every permission this role grants, including those of lower roles.
    pub fn grants(&self) -> impl Iterator<Item = Permission> + '_ {
        Self::ALL
            .iter()
            .filter(move |role| *role <= self)
            .flat_map(|role| role.level_grants().iter().copied())
    }
}

impl FromStr for WorkspaceRole {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(CoreError::InvalidWorkspaceRole {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
