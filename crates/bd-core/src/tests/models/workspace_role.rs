use crate::{Permission, WorkspaceRole};

use std::str::FromStr;

#[test]
fn test_workspace_role_as_str() {
    assert_eq!(WorkspaceRole::Viewer.as_str(), "viewer");
    assert_eq!(WorkspaceRole::Editor.as_str(), "editor");
    assert_eq!(WorkspaceRole::Admin.as_str(), "admin");
}

#[test]
fn test_workspace_role_from_str() {
    assert_eq!(
        WorkspaceRole::from_str("editor").unwrap(),
        WorkspaceRole::Editor
    );
    assert!(WorkspaceRole::from_str("owner").is_err());
}

#[test]
fn test_workspace_role_display() {
    assert_eq!(WorkspaceRole::Admin.to_string(), "admin");
}

#[test]
fn given_viewer_when_grants_then_read_only() {
    let grants: Vec<Permission> = WorkspaceRole::Viewer.grants().collect();

    assert!(grants.contains(&Permission::ChatbotRead));
    assert!(!grants.contains(&Permission::ChatbotCreate));
    assert!(!grants.contains(&Permission::WorkspaceWrite));
}

#[test]
fn given_editor_when_grants_then_can_create_but_not_delete() {
    let grants: Vec<Permission> = WorkspaceRole::Editor.grants().collect();

    assert!(grants.contains(&Permission::ChatbotRead));
    assert!(grants.contains(&Permission::ChatbotCreate));
    assert!(!grants.contains(&Permission::ChatbotDelete));
}

#[test]
fn given_workspace_admin_when_grants_then_never_deletes_workspace() {
    let grants: Vec<Permission> = WorkspaceRole::Admin.grants().collect();

    assert!(grants.contains(&Permission::WorkspaceWrite));
    assert!(!grants.contains(&Permission::WorkspaceDelete));
}
