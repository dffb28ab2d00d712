use crate::{CoreError, Permission};

use std::collections::HashSet;
use std::str::FromStr;

#[test]
fn test_permission_from_str_roundtrips_every_key() {
    for permission in Permission::ALL {
        assert_eq!(
            Permission::from_str(permission.as_str()).unwrap(),
            *permission
        );
    }
}

#[test]
fn test_permission_keys_are_unique() {
    let keys: HashSet<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
    assert_eq!(keys.len(), Permission::ALL.len());
}

#[test]
fn test_permission_unknown_key_is_error() {
    let err = Permission::from_str("billing:refund").unwrap_err();

    assert!(matches!(err, CoreError::UnknownPermission { ref value, .. } if value == "billing:refund"));
    assert!(err.to_string().contains("Unknown permission key: billing:refund"));
}

#[test]
fn test_permission_serializes_as_key() {
    let json = serde_json::to_string(&Permission::KnowledgeBaseWrite).unwrap();
    assert_eq!(json, "\"knowledge_base:write\"");
}
