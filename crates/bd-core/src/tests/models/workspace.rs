use crate::{Workspace, WorkspaceRole};

#[test]
fn given_workspace_json_without_default_flag_when_deserialize_then_not_default() {
    let json = r#"{"id":"w1","name":"Support","organization_id":"o1","role":"editor"}"#;
    let workspace: Workspace = serde_json::from_str(json).unwrap();

    assert_eq!(workspace.role, WorkspaceRole::Editor);
    assert!(!workspace.is_default);
    assert!(workspace.belongs_to("o1"));
    assert!(!workspace.belongs_to("o2"));
}
