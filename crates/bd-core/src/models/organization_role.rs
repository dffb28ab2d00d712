use crate::{CoreError, Permission, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// The caller's membership role within an organization.
///
/// Variants are declared from least to most privileged, so the derived
/// ordering reads `Member < Admin < Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationRole {
    Member,
    Admin,
    /// Billing root. Has admin access to every workspace of the organization.
    Owner,
}

const MEMBER_GRANTS: &[Permission] = &[Permission::OrganizationRead, Permission::WorkspaceRead];

const ADMIN_GRANTS: &[Permission] = &[
    Permission::OrganizationManageMembers,
    Permission::WorkspaceCreate,
    Permission::WorkspaceDelete,
    // Cascades into every workspace of the organization
    Permission::WorkspaceWrite,
    Permission::WorkspaceManageMembers,
    Permission::ChatbotRead,
    Permission::ChatbotCreate,
    Permission::ChatbotUpdate,
    Permission::ChatbotDelete,
    Permission::ChatflowRead,
    Permission::ChatflowCreate,
    Permission::ChatflowUpdate,
    Permission::ChatflowDelete,
    Permission::KnowledgeBaseRead,
    Permission::KnowledgeBaseWrite,
    Permission::KnowledgeBaseDelete,
];

const OWNER_GRANTS: &[Permission] = &[
    Permission::OrganizationWrite,
    Permission::OrganizationBilling,
    Permission::OrganizationDelete,
];

impl OrganizationRole {
    pub const ALL: &'static [OrganizationRole] = &[Self::Member, Self::Admin, Self::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Permissions introduced at exactly this level.
    fn level_grants(&self) -> &'static [Permission] {
        match self {
            Self::Member => MEMBER_GRANTS,
            Self::Admin => ADMIN_GRANTS,
            Self::Owner => OWNER_GRANTS,
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

impl FromStr for OrganizationRole {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(CoreError::InvalidOrganizationRole {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for OrganizationRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
