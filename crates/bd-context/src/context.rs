use bd_core::{
    Organization, PermissionSet, User, Workspace, derive_organization_permissions,
    derive_permissions,
};

use serde::Serialize;

/// Where the store stands after its last lifecycle step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContextStatus {
    /// Never initialized, or torn down.
    #[default]
    Empty,
    /// Organization list loaded and a selection made.
    Ready,
    /// The user belongs to no organization.
    NoAccess,
    /// Directory unreachable; running on the persisted pointer.
    Stale {
        organization_id: String,
        workspace_id: Option<String>,
    },
    /// Directory unreachable and nothing persisted to fall back on.
    Unavailable,
}

impl ContextStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// One-shot message for the user after the backend overruled a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextNotice {
    WorkspaceReassigned {
        requested_id: Option<String>,
        adopted_id: Option<String>,
        adopted_name: Option<String>,
    },
    OrganizationReassigned {
        requested_id: String,
        adopted_id: String,
        adopted_name: String,
    },
}

impl ContextNotice {
    pub(crate) fn workspace_reassigned(
        requested_id: Option<String>,
        adopted: Option<&Workspace>,
    ) -> Self {
        Self::WorkspaceReassigned {
            requested_id,
            adopted_id: adopted.map(|workspace| workspace.id.clone()),
            adopted_name: adopted.map(|workspace| workspace.name.clone()),
        }
    }

    pub(crate) fn organization_reassigned(requested_id: &str, adopted: &Organization) -> Self {
        Self::OrganizationReassigned {
            requested_id: requested_id.to_string(),
            adopted_id: adopted.id.clone(),
            adopted_name: adopted.name.clone(),
        }
    }
}

impl std::fmt::Display for ContextNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkspaceReassigned {
                adopted_name: Some(name),
                ..
            } => write!(f, "The requested workspace is unavailable; switched to '{name}'"),
            Self::WorkspaceReassigned { .. } => {
                write!(f, "The requested workspace is unavailable; no workspace is selected")
            }
            Self::OrganizationReassigned { adopted_name, .. } => {
                write!(f, "The requested organization is unavailable; switched to '{adopted_name}'")
            }
        }
    }
}

/// Snapshot of the active tenancy context.
///
/// The selected workspace, when present, always belongs to the selected
/// organization, and `permissions` is always derived from the selected pair.
/// Both hold because selection only happens through [`TenancyContext::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenancyContext {
    user: Option<User>,
    organizations: Vec<Organization>,
    workspaces: Vec<Workspace>,
    current_organization: Option<Organization>,
    current_workspace: Option<Workspace>,
    permissions: PermissionSet,
    status: ContextStatus,
}

impl TenancyContext {
    pub(crate) fn for_user(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn current_organization(&self) -> Option<&Organization> {
        self.current_organization.as_ref()
    }

    pub fn current_workspace(&self) -> Option<&Workspace> {
        self.current_workspace.as_ref()
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn status(&self) -> &ContextStatus {
        &self.status
    }

    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.is_granted(key)
    }

    pub fn organization(&self, organization_id: &str) -> Option<&Organization> {
        self.organizations
            .iter()
            .find(|organization| organization.id == organization_id)
    }

    pub fn workspace(&self, workspace_id: &str) -> Option<&Workspace> {
        self.workspaces
            .iter()
            .find(|workspace| workspace.id == workspace_id)
    }

    /// True when the selection and permissions satisfy the context invariants.
    pub fn is_consistent(&self) -> bool {
        let workspace_matches = match (&self.current_organization, &self.current_workspace) {
            (Some(organization), Some(workspace)) => workspace.belongs_to(&organization.id),
            (None, Some(_)) => false,
            _ => true,
        };
        let workspaces_match = match &self.current_organization {
            Some(organization) => self
                .workspaces
                .iter()
                .all(|workspace| workspace.belongs_to(&organization.id)),
            None => self.workspaces.is_empty(),
        };
        workspace_matches
            && workspaces_match
            && self.permissions == Self::permissions_for(
                self.current_organization.as_ref(),
                self.current_workspace.as_ref(),
            )
    }

    fn permissions_for(
        organization: Option<&Organization>,
        workspace: Option<&Workspace>,
    ) -> PermissionSet {
        match (organization, workspace) {
            (Some(organization), Some(workspace)) => {
                derive_permissions(organization.role, workspace.role)
            }
            (Some(organization), None) => derive_organization_permissions(organization.role),
            (None, _) => PermissionSet::empty(),
        }
    }

    pub(crate) fn set_organizations(&mut self, organizations: Vec<Organization>) {
        self.organizations = organizations;
    }

    pub(crate) fn set_status(&mut self, status: ContextStatus) {
        self.status = status;
    }

    /// Replace the workspace list and the selected pair in one step.
    ///
    /// Workspaces of other organizations are dropped. List entries for the
    /// selected pair are replaced so their roles match the selection.
    pub(crate) fn select(
        &mut self,
        organization: Organization,
        workspaces: Vec<Workspace>,
        workspace: Option<Workspace>,
    ) {
        let mut workspaces: Vec<Workspace> = workspaces
            .into_iter()
            .filter(|candidate| candidate.belongs_to(&organization.id))
            .collect();
        let workspace = workspace.filter(|candidate| candidate.belongs_to(&organization.id));

        if let Some(selected) = &workspace
            && let Some(entry) = workspaces.iter_mut().find(|entry| entry.id == selected.id)
        {
            *entry = selected.clone();
        }

        if let Some(entry) = self
            .organizations
            .iter_mut()
            .find(|entry| entry.id == organization.id)
        {
            *entry = organization.clone();
        }

        self.permissions = Self::permissions_for(Some(&organization), workspace.as_ref());
        self.workspaces = workspaces;
        self.current_organization = Some(organization);
        self.current_workspace = workspace;
    }
}
