//! Fallback rules for picking the active organization and workspace.
//!
//! Order is always: persisted id if still listed, then the default entry,
//! then the first entry in directory order.

use bd_core::{Organization, Workspace};

pub fn select_organization<'a>(
    organizations: &'a [Organization],
    persisted: Option<&str>,
) -> Option<&'a Organization> {
    persisted
        .and_then(|id| organizations.iter().find(|organization| organization.id == id))
        .or_else(|| organizations.iter().find(|organization| organization.is_default))
        .or_else(|| organizations.first())
}

/// Only workspaces of `organization_id` are candidates, so a persisted
/// workspace from another organization is never picked.
pub fn select_workspace<'a>(
    workspaces: &'a [Workspace],
    organization_id: &str,
    persisted: Option<&str>,
) -> Option<&'a Workspace> {
    let mut candidates = workspaces
        .iter()
        .filter(|workspace| workspace.belongs_to(organization_id));

    persisted
        .and_then(|id| candidates.clone().find(|workspace| workspace.id == id))
        .or_else(|| candidates.clone().find(|workspace| workspace.is_default))
        .or_else(|| candidates.next())
}
