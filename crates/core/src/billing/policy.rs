//! Access policy predicates.
//!
//! Role resolution happens in the identity layer; these predicates only
//! decide whether a resolved caller may read or mutate a billing resource.
//! They are evaluated at the boundary of each operation, independent of
//! persistence concerns.

use uuid::Uuid;

/// Caller role resolved by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May read and mutate everything.
    Admin,
    /// May only read resources they own.
    Student,
}

impl Role {
    /// Parses a role string from JWT claims.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

/// Returns true if the caller may read a resource owned by `owner_id`.
#[must_use]
pub fn can_access(role: Role, caller_id: Uuid, owner_id: Uuid) -> bool {
    match role {
        Role::Admin => true,
        Role::Student => caller_id == owner_id,
    }
}

/// Returns true if the caller may perform mutating billing operations
/// (create obligations, record payments, override status, generate invoices).
#[must_use]
pub fn can_mutate(role: Role) -> bool {
    matches!(role, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_accesses_any_resource() {
        let caller = Uuid::new_v4();
        let owner = Uuid::new_v4();
        assert!(can_access(Role::Admin, caller, owner));
        assert!(can_access(Role::Admin, caller, caller));
    }

    #[test]
    fn test_student_accesses_only_own_resources() {
        let caller = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_access(Role::Student, caller, caller));
        assert!(!can_access(Role::Student, caller, other));
    }

    #[test]
    fn test_only_admin_mutates() {
        assert!(can_mutate(Role::Admin));
        assert!(!can_mutate(Role::Student));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("student"), Some(Role::Student));
        assert_eq!(Role::parse("teacher"), None);
        assert_eq!(Role::parse(""), None);
    }
}
