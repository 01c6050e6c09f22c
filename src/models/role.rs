//! Role and permission models.

use serde::{Deserialize, Serialize};

/// Closed set of actions a permission can grant on its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    Manage,
}

impl PermissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionAction::Create => "create",
            PermissionAction::Read => "read",
            PermissionAction::Update => "update",
            PermissionAction::Delete => "delete",
            PermissionAction::Manage => "manage",
        }
    }
}

/// A named grant on a single resource, `resource:action` by convention.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    pub resource: String,
    pub action: PermissionAction,
    pub is_active: bool,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: PermissionAction) -> Self {
        let resource = resource.into();
        Self {
            name: format!("{}:{}", resource, action.as_str()),
            resource,
            action,
            is_active: true,
        }
    }
}

/// Role entity: directly granted permissions plus an inherits-from relation
/// over role names. The relation is a directed graph and is not guaranteed
/// acyclic; resolution tolerates cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub permissions: Vec<Permission>,
    /// Parent role names this role inherits permissions from.
    pub inherits: Vec<String>,
    /// Advisory ordering hint, not enforced anywhere.
    pub level: i32,
}

impl Role {
    pub fn new(name: impl Into<String>, level: i32) -> Self {
        Self {
            name: name.into(),
            permissions: Vec::new(),
            inherits: Vec::new(),
            level,
        }
    }

    pub fn grant(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    pub fn inherit(mut self, parent: impl Into<String>) -> Self {
        self.inherits.push(parent.into());
        self
    }
}
