//! Authorization predicates consumed by UI gating components.
//!
//! These are total functions that never panic. An empty grant set answers
//! `false`; an empty "all of" requirement is vacuously `true`. The session
//! snapshot re-exposes them as methods.

use std::collections::HashSet;

use crate::permissions::Permission;
use crate::roles::{ADMIN, Role, SUPER_ADMIN};

pub fn has_permission(permissions: &HashSet<Permission>, required: &str) -> bool {
    permissions.contains(required)
}

pub fn has_any_permission<'a, I>(permissions: &HashSet<Permission>, required: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    required.into_iter().any(|p| permissions.contains(p))
}

/// Vacuously `true` when `required` is empty: a gate with no requirements
/// admits everyone.
pub fn has_all_permissions<'a, I>(permissions: &HashSet<Permission>, required: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    required.into_iter().all(|p| permissions.contains(p))
}

pub fn has_role(roles: &HashSet<Role>, required: &str) -> bool {
    roles.contains(required)
}

pub fn has_any_role<'a, I>(roles: &HashSet<Role>, required: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    required.into_iter().any(|r| roles.contains(r))
}

pub fn is_admin(roles: &HashSet<Role>) -> bool {
    has_role(roles, ADMIN)
}

pub fn is_super_admin(roles: &HashSet<Role>) -> bool {
    has_role(roles, SUPER_ADMIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perms(names: &[&'static str]) -> HashSet<Permission> {
        names.iter().map(|n| Permission::new(*n)).collect()
    }

    fn roles(names: &[&'static str]) -> HashSet<Role> {
        names.iter().map(|n| Role::new(*n)).collect()
    }

    #[test]
    fn membership_tests() {
        let p = perms(&["projects.read", "projects.write"]);
        assert!(has_permission(&p, "projects.read"));
        assert!(!has_permission(&p, "billing.read"));
    }

    #[test]
    fn any_permission_matches_one_of_many() {
        let p = perms(&["b"]);
        assert!(has_any_permission(&p, ["a", "b"]));
        assert!(!has_any_permission(&perms(&[]), ["a", "b"]));
        assert!(!has_any_permission(&p, []));
    }

    #[test]
    fn all_permissions_requires_every_entry() {
        let p = perms(&["a", "b", "c"]);
        assert!(has_all_permissions(&p, ["a", "b"]));
        assert!(!has_all_permissions(&p, ["a", "d"]));
    }

    #[test]
    fn all_of_nothing_is_vacuously_granted() {
        assert!(has_all_permissions(&perms(&["a"]), []));
        assert!(has_all_permissions(&perms(&[]), []));
    }

    #[test]
    fn role_predicates() {
        let r = roles(&["admin", "editor"]);
        assert!(has_role(&r, "editor"));
        assert!(has_any_role(&r, ["viewer", "editor"]));
        assert!(is_admin(&r));
        assert!(!is_super_admin(&r));
        assert!(is_super_admin(&roles(&["super_admin"])));
    }

    #[test]
    fn empty_sets_answer_false() {
        let r = roles(&[]);
        assert!(!has_role(&r, "admin"));
        assert!(!is_admin(&r));
        assert!(!has_any_role(&r, ["admin"]));
    }
}
