use crate::{OrganizationRole, Permission};

use std::str::FromStr;

#[test]
fn test_organization_role_as_str() {
    assert_eq!(OrganizationRole::Member.as_str(), "member");
    assert_eq!(OrganizationRole::Admin.as_str(), "admin");
    assert_eq!(OrganizationRole::Owner.as_str(), "owner");
}

#[test]
fn test_organization_role_from_str() {
    assert_eq!(
        OrganizationRole::from_str("owner").unwrap(),
        OrganizationRole::Owner
    );
    assert_eq!(
        OrganizationRole::from_str("member").unwrap(),
        OrganizationRole::Member
    );
    assert!(OrganizationRole::from_str("viewer").is_err());
    assert!(OrganizationRole::from_str("Owner").is_err());
}

#[test]
fn test_organization_role_ordering() {
    assert!(OrganizationRole::Member < OrganizationRole::Admin);
    assert!(OrganizationRole::Admin < OrganizationRole::Owner);
}

#[test]
fn test_organization_role_deserializes_snake_case() {
    let role: OrganizationRole = serde_json::from_str("\"admin\"").unwrap();
    assert_eq!(role, OrganizationRole::Admin);
}

#[test]
fn given_member_when_grants_then_cannot_write_workspace() {
    let grants: Vec<Permission> = OrganizationRole::Member.grants().collect();

    assert!(grants.contains(&Permission::OrganizationRead));
    assert!(!grants.contains(&Permission::WorkspaceWrite));
    assert!(!grants.contains(&Permission::ChatbotCreate));
}

#[test]
fn given_admin_when_grants_then_cascades_into_workspaces() {
    let grants: Vec<Permission> = OrganizationRole::Admin.grants().collect();

    assert!(grants.contains(&Permission::WorkspaceWrite));
    assert!(grants.contains(&Permission::ChatbotDelete));
    assert!(!grants.contains(&Permission::OrganizationBilling));
}

#[test]
fn given_owner_when_grants_then_includes_billing_and_delete() {
    let grants: Vec<Permission> = OrganizationRole::Owner.grants().collect();

    assert!(grants.contains(&Permission::OrganizationBilling));
    assert!(grants.contains(&Permission::OrganizationDelete));
    assert!(grants.contains(&Permission::OrganizationRead));
}
