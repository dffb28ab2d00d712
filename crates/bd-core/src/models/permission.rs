use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Permission keys the dashboard branches on.
///
/// The backend may issue keys outside this list. Those are looked up by string
/// through [`crate::PermissionSet::is_granted`] and are never granted locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "organization:read")]
    OrganizationRead,
    #[serde(rename = "organization:write")]
    OrganizationWrite,
    #[serde(rename = "organization:billing")]
    OrganizationBilling,
    #[serde(rename = "organization:delete")]
    OrganizationDelete,
    #[serde(rename = "organization:manage_members")]
    OrganizationManageMembers,
    #[serde(rename = "workspace:create")]
    WorkspaceCreate,
    #[serde(rename = "workspace:read")]
    WorkspaceRead,
    #[serde(rename = "workspace:write")]
    WorkspaceWrite,
    #[serde(rename = "workspace:delete")]
    WorkspaceDelete,
    #[serde(rename = "workspace:manage_members")]
    WorkspaceManageMembers,
    #[serde(rename = "chatbot:read")]
    ChatbotRead,
    #[serde(rename = "chatbot:create")]
    ChatbotCreate,
    #[serde(rename = "chatbot:update")]
    ChatbotUpdate,
    #[serde(rename = "chatbot:delete")]
    ChatbotDelete,
    #[serde(rename = "chatflow:read")]
    ChatflowRead,
    #[serde(rename = "chatflow:create")]
    ChatflowCreate,
    #[serde(rename = "chatflow:update")]
    ChatflowUpdate,
    #[serde(rename = "chatflow:delete")]
    ChatflowDelete,
    #[serde(rename = "knowledge_base:read")]
    KnowledgeBaseRead,
    #[serde(rename = "knowledge_base:write")]
    KnowledgeBaseWrite,
    #[serde(rename = "knowledge_base:delete")]
    KnowledgeBaseDelete,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Self::OrganizationRead,
        Self::OrganizationWrite,
        Self::OrganizationBilling,
        Self::OrganizationDelete,
        Self::OrganizationManageMembers,
        Self::WorkspaceCreate,
        Self::WorkspaceRead,
        Self::WorkspaceWrite,
        Self::WorkspaceDelete,
        Self::WorkspaceManageMembers,
        Self::ChatbotRead,
        Self::ChatbotCreate,
        Self::ChatbotUpdate,
        Self::ChatbotDelete,
        Self::ChatflowRead,
        Self::ChatflowCreate,
        Self::ChatflowUpdate,
        Self::ChatflowDelete,
        Self::KnowledgeBaseRead,
        Self::KnowledgeBaseWrite,
        Self::KnowledgeBaseDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrganizationRead => "organization:read",
            Self::OrganizationWrite => "organization:write",
            Self::OrganizationBilling => "organization:billing",
            Self::OrganizationDelete => "organization:delete",
            Self::OrganizationManageMembers => "organization:manage_members",
            Self::WorkspaceCreate => "workspace:create",
            Self::WorkspaceRead => "workspace:read",
            Self::WorkspaceWrite => "workspace:write",
            Self::WorkspaceDelete => "workspace:delete",
            Self::WorkspaceManageMembers => "workspace:manage_members",
            Self::ChatbotRead => "chatbot:read",
            Self::ChatbotCreate => "chatbot:create",
            Self::ChatbotUpdate => "chatbot:update",
            Self::ChatbotDelete => "chatbot:delete",
            Self::ChatflowRead => "chatflow:read",
            Self::ChatflowCreate => "chatflow:create",
            Self::ChatflowUpdate => "chatflow:update",
            Self::ChatflowDelete => "chatflow:delete",
            Self::KnowledgeBaseRead => "knowledge_base:read",
            Self::KnowledgeBaseWrite => "knowledge_base:write",
            Self::KnowledgeBaseDelete => "knowledge_base:delete",
        }
    }
}

impl FromStr for Permission {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        let location = ErrorLocation::from(Location::caller());
        Self::ALL
            .iter()
            .copied()
            .find(|permission| permission.as_str() == s)
            .ok_or(CoreError::UnknownPermission {
                value: s.to_string(),
                location,
            })
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
