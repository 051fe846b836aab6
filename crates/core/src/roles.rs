//! The closed set of user roles and the single capability check used by every
//! protected operation.
//!
//! Roles are persisted as small integers; the numeric values must match the
//! check constraint in `20250101000004_create_users_table.sql`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ROLE_PRODUCT_WORKER: &str = "product worker";
pub const ROLE_WAREHOUSE_WORKER: &str = "warehouse worker";
pub const ROLE_ADMIN: &str = "admin";

/// A user's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Role {
    ProductWorker,
    WarehouseWorker,
    Admin,
}

/// A stored role value outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown role value {0}")]
pub struct UnknownRole(pub i16);

impl Role {
    /// The lowest-privilege role, used when registration names no known role.
    pub const LOWEST: Role = Role::ProductWorker;

    /// Canonical display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::ProductWorker => ROLE_PRODUCT_WORKER,
            Role::WarehouseWorker => ROLE_WAREHOUSE_WORKER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Integer representation stored in the database and in token claims.
    pub fn code(self) -> i16 {
        match self {
            Role::ProductWorker => 0,
            Role::WarehouseWorker => 1,
            Role::Admin => 2,
        }
    }

    /// Parse a role name. Accepts the canonical name as well as the
    /// hyphenated and underscored spellings (`product-worker`,
    /// `warehouse_worker`), case-insensitively.
    pub fn from_name(name: &str) -> Option<Role> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            ROLE_PRODUCT_WORKER => Some(Role::ProductWorker),
            ROLE_WAREHOUSE_WORKER => Some(Role::WarehouseWorker),
            ROLE_ADMIN => Some(Role::Admin),
            _ => None,
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = UnknownRole;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::ProductWorker),
            1 => Ok(Role::WarehouseWorker),
            2 => Ok(Role::Admin),
            other => Err(UnknownRole(other)),
        }
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `actual` may perform an operation open to `required`.
///
/// Admin is a superset role and passes every check. An empty `required` set
/// means "any authenticated role".
pub fn authorize(required: &[Role], actual: Role) -> bool {
    actual == Role::Admin || required.is_empty() || required.contains(&actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_for_every_role() {
        for role in [Role::ProductWorker, Role::WarehouseWorker, Role::Admin] {
            assert_eq!(Role::try_from(role.code()), Ok(role));
        }
        assert_eq!(Role::try_from(7), Err(UnknownRole(7)));
    }

    #[test]
    fn names_accept_common_spellings() {
        assert_eq!(Role::from_name("product worker"), Some(Role::ProductWorker));
        assert_eq!(Role::from_name("Warehouse-Worker"), Some(Role::WarehouseWorker));
        assert_eq!(Role::from_name("warehouse_worker"), Some(Role::WarehouseWorker));
        assert_eq!(Role::from_name(" admin "), Some(Role::Admin));
        assert_eq!(Role::from_name("superuser"), None);
    }

    #[test]
    fn admin_passes_every_check() {
        assert!(authorize(&[Role::WarehouseWorker], Role::Admin));
        assert!(authorize(&[Role::ProductWorker], Role::Admin));
    }

    #[test]
    fn workers_only_pass_their_own_checks() {
        assert!(authorize(&[Role::ProductWorker, Role::WarehouseWorker], Role::ProductWorker));
        assert!(!authorize(&[Role::WarehouseWorker], Role::ProductWorker));
        assert!(!authorize(&[Role::Admin], Role::WarehouseWorker));
        assert!(authorize(&[], Role::ProductWorker));
    }
}
