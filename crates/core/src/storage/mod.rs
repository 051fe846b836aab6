//! Storage port consumed by the services.
//!
//! - [`InventoryStore`] -- warehouses, stock lines, and reservations.
//! - [`UserStore`] -- users, roles, and the latest token pair per user.
//! - [`memory::MemoryStore`] -- in-memory implementation of both traits.
//!
//! Implementations must report a missing row as [`StoreError::NotFound`] so
//! the services can tell "absent" apart from a backend failure.

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{DbId, UserId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The referenced row does not exist.
    #[error("row not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("duplicate value: {0}")]
    Duplicate(String),

    /// Any other backend failure (connection, query, lock poisoning, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A committed hold of `count` units of `product_code` in `warehouse_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub warehouse_id: DbId,
    pub product_code: String,
    pub count: i32,
}

/// A user row as needed by the auth service.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub password_hash: String,
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Warehouse, stock line, and reservation persistence.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Whether the warehouse currently accepts reservations.
    async fn warehouse_available(&self, warehouse_id: DbId) -> Result<bool, StoreError>;

    /// Units left on the stock line. `NotFound` if the line does not exist.
    async fn left_count(&self, warehouse_id: DbId, product_code: &str) -> Result<i32, StoreError>;

    /// Atomically decrement the stock line by `count` if at least `count`
    /// units are left.
    ///
    /// Returns `Ok(false)` when the line holds fewer than `count` units; the
    /// line is left untouched in that case and never goes negative.
    async fn take_stock(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<bool, StoreError>;

    /// Add `count` units back to the stock line.
    async fn restock(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<(), StoreError>;

    /// Insert a reservation row, returning its storage-assigned id.
    async fn create_reservation(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<DbId, StoreError>;

    /// Delete a reservation, returning the removed row. `NotFound` if absent.
    async fn delete_reservation(&self, reservation_id: DbId) -> Result<Reservation, StoreError>;

    /// The warehouse owning a reservation. `NotFound` if absent.
    async fn warehouse_by_reservation(&self, reservation_id: DbId) -> Result<DbId, StoreError>;

    /// Product codes of every stock line in the warehouse.
    async fn product_codes(&self, warehouse_id: DbId) -> Result<Vec<String>, StoreError>;
}

/// User, role, and token-pair persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by login. `NotFound` if absent.
    async fn user_by_login(&self, login: &str) -> Result<User, StoreError>;

    /// Insert a user together with its role code, in one write. `Duplicate`
    /// if the login is taken.
    async fn create_user(
        &self,
        id: &str,
        login: &str,
        password_hash: &str,
        role: i16,
    ) -> Result<(), StoreError>;

    /// Assign the role code for a user.
    async fn set_user_role(&self, user_id: &str, role: i16) -> Result<(), StoreError>;

    /// The stored role code for a user. `NotFound` if the user has no role.
    async fn user_role(&self, user_id: &str) -> Result<i16, StoreError>;

    /// Create or overwrite the user's token pair.
    async fn upsert_tokens(
        &self,
        user_id: &str,
        access: &str,
        refresh: &str,
    ) -> Result<(), StoreError>;

    /// Overwrite only the access half of the user's token pair.
    async fn update_access_token(&self, user_id: &str, access: &str) -> Result<(), StoreError>;

    /// The refresh half of the user's latest token pair. `NotFound` if the
    /// user never logged in.
    async fn refresh_token(&self, user_id: &str) -> Result<String, StoreError>;
}
