use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::Role;

/// A snapshot of roles supplied by the caller. The resolver reads it; it does
/// not own storage.
#[derive(Debug, Clone, Default)]
pub struct RoleSet {
    roles: HashMap<String, Role>,
}

impl RoleSet {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles
                .into_iter()
                .map(|role| (role.name.clone(), role))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }
}

/// Compute a role's effective permission set: the union of its directly
/// granted permissions and everything reachable through the inherits-from
/// relation.
///
/// The relation is a directed graph that may contain cycles; a visited set
/// guarantees termination and that no role contributes twice. Unknown parent
/// names and inactive permissions are data-quality conditions to tolerate,
/// not faults. The `BTreeSet` makes the result deterministic.
pub fn effective_permissions(role_name: &str, roles: &RoleSet) -> BTreeSet<String> {
    let mut visited = HashSet::new();
    let mut effective = BTreeSet::new();
    collect(role_name, roles, &mut visited, &mut effective);
    effective
}

fn collect(
    name: &str,
    roles: &RoleSet,
    visited: &mut HashSet<String>,
    effective: &mut BTreeSet<String>,
) {
    // Re-entering a role already on this traversal means a cycle (or a
    // diamond); its permissions are already accounted for.
    if !visited.insert(name.to_string()) {
        return;
    }

    let Some(role) = roles.get(name) else {
        tracing::warn!(role = name, "Unknown role in inheritance chain, skipping");
        return;
    };

    for permission in &role.permissions {
        if permission.is_active {
            effective.insert(permission.name.clone());
        }
    }

    for parent in &role.inherits {
        collect(parent, roles, visited, effective);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Permission, PermissionAction};

    fn perm(resource: &str, action: PermissionAction) -> Permission {
        Permission::new(resource, action)
    }

    #[test]
    fn test_direct_permissions_only() {
        let roles = RoleSet::new([Role::new("viewer", 1)
            .grant(perm("report", PermissionAction::Read))]);

        let effective = effective_permissions("viewer", &roles);
        assert_eq!(
            effective.into_iter().collect::<Vec<_>>(),
            vec!["report:read"]
        );
    }

    #[test]
    fn test_union_with_inherited_permissions() {
        let roles = RoleSet::new([
            Role::new("editor", 2)
                .grant(perm("report", PermissionAction::Update))
                .inherit("viewer"),
            Role::new("viewer", 1).grant(perm("report", PermissionAction::Read)),
        ]);

        let effective = effective_permissions("editor", &roles);
        assert_eq!(
            effective.into_iter().collect::<Vec<_>>(),
            vec!["report:read", "report:update"]
        );
    }

    #[test]
    fn test_cycle_terminates_without_duplication() {
        // viewer and editor inherit from each other.
        let roles = RoleSet::new([
            Role::new("editor", 2)
                .grant(perm("report", PermissionAction::Update))
                .inherit("viewer"),
            Role::new("viewer", 1)
                .grant(perm("report", PermissionAction::Read))
                .inherit("editor"),
        ]);

        let effective = effective_permissions("editor", &roles);
        assert_eq!(
            effective.into_iter().collect::<Vec<_>>(),
            vec!["report:read", "report:update"]
        );
    }

    #[test]
    fn test_self_cycle_terminates() {
        let roles = RoleSet::new([Role::new("ouroboros", 1)
            .grant(perm("tail", PermissionAction::Read))
            .inherit("ouroboros")]);

        let effective = effective_permissions("ouroboros", &roles);
        assert_eq!(effective.len(), 1);
    }

    #[test]
    fn test_diamond_inheritance_collapses_duplicates() {
        // admin -> {editor, auditor} -> viewer
        let roles = RoleSet::new([
            Role::new("admin", 3)
                .grant(perm("user", PermissionAction::Manage))
                .inherit("editor")
                .inherit("auditor"),
            Role::new("editor", 2)
                .grant(perm("report", PermissionAction::Update))
                .inherit("viewer"),
            Role::new("auditor", 2).inherit("viewer"),
            Role::new("viewer", 1).grant(perm("report", PermissionAction::Read)),
        ]);

        let effective = effective_permissions("admin", &roles);
        assert_eq!(
            effective.into_iter().collect::<Vec<_>>(),
            vec!["report:read", "report:update", "user:manage"]
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let roles = RoleSet::new([
            Role::new("editor", 2)
                .grant(perm("report", PermissionAction::Update))
                .inherit("viewer"),
            Role::new("viewer", 1).grant(perm("report", PermissionAction::Read)),
        ]);

        let first = effective_permissions("editor", &roles);
        let second = effective_permissions("editor", &roles);
        assert_eq!(first, second);
    }

    #[test]
    fn test_inactive_permissions_are_excluded() {
        let mut retired = perm("legacy", PermissionAction::Delete);
        retired.is_active = false;

        let roles = RoleSet::new([Role::new("viewer", 1)
            .grant(perm("report", PermissionAction::Read))
            .grant(retired)]);

        let effective = effective_permissions("viewer", &roles);
        assert!(!effective.contains("legacy:delete"));
        assert_eq!(effective.len(), 1);
    }

    #[test]
    fn test_unknown_parent_is_tolerated() {
        let roles = RoleSet::new([Role::new("viewer", 1)
            .grant(perm("report", PermissionAction::Read))
            .inherit("deleted-role")]);

        let effective = effective_permissions("viewer", &roles);
        assert_eq!(effective.len(), 1);
    }

    #[test]
    fn test_unknown_role_resolves_to_empty_set() {
        let roles = RoleSet::default();
        assert!(effective_permissions("ghost", &roles).is_empty());
    }
}
