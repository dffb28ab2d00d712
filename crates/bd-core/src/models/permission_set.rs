use crate::{OrganizationRole, Permission, WorkspaceRole};

use std::collections::BTreeMap;

use serde::Serialize;

/// Permission key to granted flag, regenerated wholesale from a role pair.
///
/// There is no public way to flip a single key: a set is either
/// [`PermissionSet::empty`] or the output of one of the derive functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionSet {
    entries: BTreeMap<String, bool>,
}

impl PermissionSet {
    /// Least-privileged baseline: every known key present and `false`.
    pub fn empty() -> Self {
        Self {
            entries: Permission::ALL
                .iter()
                .map(|permission| (permission.as_str().to_string(), false))
                .collect(),
        }
    }

    fn grant_all(&mut self, permissions: impl Iterator<Item = Permission>) {
        for permission in permissions {
            self.entries.insert(permission.as_str().to_string(), true);
        }
    }

    /// Look up a key by string. Unknown keys are not granted.
    pub fn is_granted(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.is_granted(permission.as_str())
    }

    /// Granted keys in lexical order.
    pub fn granted(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.granted().next().is_none()
    }

    /// True when every key granted here is also granted by `other`.
    pub fn is_subset_of(&self, other: &PermissionSet) -> bool {
        self.granted().all(|key| other.is_granted(key))
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Combine organization and workspace grants for the active pair.
///
/// A key is granted when either role grants it. Organization admin rights
/// cascade into every workspace; workspace admin rights apply even to a plain
/// organization member.
pub fn derive_permissions(
    organization_role: OrganizationRole,
    workspace_role: WorkspaceRole,
) -> PermissionSet {
    let mut set = PermissionSet::empty();
    set.grant_all(organization_role.grants());
    set.grant_all(workspace_role.grants());
    set
}

/// Grants for an organization selected without any reachable workspace.
pub fn derive_organization_permissions(organization_role: OrganizationRole) -> PermissionSet {
    let mut set = PermissionSet::empty();
    set.grant_all(organization_role.grants());
    set
}
