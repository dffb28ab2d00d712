use crate::OrganizationRole;

use serde::{Deserialize, Serialize};

/// Billing and tenancy root, as listed by the directory for one user.
///
/// `role` is the caller's membership role, not a property of the organization.
/// Exactly one organization per user carries `is_default` (the personal org).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub subscription_tier: String,
    pub role: OrganizationRole,
    #[serde(default)]
    pub is_default: bool,
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: OrganizationRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subscription_tier: String::from("free"),
            role,
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}
