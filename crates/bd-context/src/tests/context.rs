use crate::{ContextNotice, ContextStatus, TenancyContext};

use bd_core::{Organization, OrganizationRole, User, Workspace, WorkspaceRole};

#[test]
fn given_fresh_context_when_inspected_then_empty_and_consistent() {
    let context = TenancyContext::default();

    assert_eq!(context.status(), &ContextStatus::Empty);
    assert!(context.current_organization().is_none());
    assert!(context.permissions().is_empty());
    assert!(context.is_consistent());
}

#[test]
fn given_foreign_workspace_when_selected_then_dropped() {
    // Given
    let mut context = TenancyContext::for_user(User::new("u1"));
    let organization = Organization::new("p", "Personal", OrganizationRole::Member);
    let foreign = Workspace::new("w-t", "Team", "t", WorkspaceRole::Admin);

    // When
    context.select(organization, vec![foreign.clone()], Some(foreign));

    // Then
    assert!(context.current_workspace().is_none());
    assert!(context.workspaces().is_empty());
    assert!(!context.has_permission("workspace:write"));
    assert!(context.is_consistent());
}

#[test]
fn given_org_without_workspace_when_selected_then_org_grants_only() {
    let mut context = TenancyContext::for_user(User::new("u1"));

    context.select(
        Organization::new("p", "Personal", OrganizationRole::Owner),
        Vec::new(),
        None,
    );

    assert!(context.has_permission("organization:billing"));
    assert!(context.has_permission("chatbot:delete"));
    assert!(context.is_consistent());
}

#[test]
fn given_role_override_when_selected_then_list_entries_follow() {
    // Given
    let mut context = TenancyContext::for_user(User::new("u1"));
    context.set_organizations(vec![Organization::new("p", "Personal", OrganizationRole::Member)]);
    let listed = Workspace::new("w1", "One", "p", WorkspaceRole::Viewer);
    let mut promoted = listed.clone();
    promoted.role = WorkspaceRole::Admin;

    // When
    context.select(
        Organization::new("p", "Personal", OrganizationRole::Admin),
        vec![listed],
        Some(promoted),
    );

    // Then
    assert_eq!(context.organizations()[0].role, OrganizationRole::Admin);
    assert_eq!(context.workspaces()[0].role, WorkspaceRole::Admin);
    assert!(context.has_permission("workspace:manage_members"));
}

#[test]
fn given_stale_status_when_serialized_then_tagged() {
    let status = ContextStatus::Stale {
        organization_id: String::from("t"),
        workspace_id: None,
    };

    let json = serde_json::to_value(&status).unwrap();

    assert_eq!(json["state"], "stale");
    assert_eq!(json["organization_id"], "t");
    assert!(json["workspace_id"].is_null());
}

#[test]
fn given_workspace_notice_when_displayed_then_names_adopted_workspace() {
    let adopted = Workspace::new("w2", "Support", "p", WorkspaceRole::Viewer);

    let notice = ContextNotice::workspace_reassigned(Some(String::from("w1")), Some(&adopted));

    assert_eq!(
        notice.to_string(),
        "The requested workspace is unavailable; switched to 'Support'"
    );
}
