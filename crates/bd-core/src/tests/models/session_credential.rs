use crate::{OrganizationRole, SessionCredential};

#[test]
fn given_switch_response_when_deserialize_then_maps_credential_field() {
    let json = r#"{
        "credential": "token-abc",
        "organization_id": "o1",
        "workspace_id": "w1",
        "organization_role": "owner"
    }"#;
    let credential: SessionCredential = serde_json::from_str(json).unwrap();

    assert_eq!(credential.token, "token-abc");
    assert_eq!(credential.workspace_id.as_deref(), Some("w1"));
    assert_eq!(credential.organization_role, Some(OrganizationRole::Owner));
    assert!(credential.workspace_role.is_none());
}

#[test]
fn given_credential_when_debug_formatted_then_token_redacted() {
    let credential = SessionCredential {
        token: "secret-token".into(),
        organization_id: "o1".into(),
        workspace_id: None,
        organization_role: None,
        workspace_role: None,
    };

    let debug = format!("{credential:?}");

    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("o1"));
}
