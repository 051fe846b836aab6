//! In-memory storage backend.
//!
//! Intended for tests and local development. All state sits behind a single
//! `RwLock`, so the conditional stock decrement is atomic with respect to
//! concurrent callers.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{InventoryStore, Reservation, StoreError, User, UserStore};
use crate::types::DbId;

#[derive(Debug, Default)]
struct Inner {
    warehouses: HashMap<DbId, bool>,
    /// Keyed by `(warehouse_id, product_code)`; ordered so listings are stable.
    stock: BTreeMap<(DbId, String), i32>,
    reservations: HashMap<DbId, Reservation>,
    next_reservation_id: DbId,
    users: HashMap<String, User>,
    roles: HashMap<String, i16>,
    tokens: HashMap<String, (String, String)>,
}

/// Storage port implementation backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    // -- Provisioning helpers (stock lines are created outside the core) --

    /// Register a warehouse with the given availability flag.
    pub fn put_warehouse(&self, warehouse_id: DbId, available: bool) {
        if let Ok(mut inner) = self.write() {
            inner.warehouses.insert(warehouse_id, available);
        }
    }

    /// Create or overwrite a stock line.
    pub fn put_stock(&self, warehouse_id: DbId, product_code: &str, left_count: i32) {
        if let Ok(mut inner) = self.write() {
            inner
                .stock
                .insert((warehouse_id, product_code.to_string()), left_count);
        }
    }

    /// Current units left on a stock line, if it exists.
    pub fn stock(&self, warehouse_id: DbId, product_code: &str) -> Option<i32> {
        self.read()
            .ok()?
            .stock
            .get(&(warehouse_id, product_code.to_string()))
            .copied()
    }

    /// A reservation by id, if it exists.
    pub fn reservation(&self, reservation_id: DbId) -> Option<Reservation> {
        self.read().ok()?.reservations.get(&reservation_id).cloned()
    }

    /// Number of live reservations.
    pub fn reservation_count(&self) -> usize {
        self.read().map(|inner| inner.reservations.len()).unwrap_or(0)
    }

    /// The stored `(access, refresh)` pair for a user, if any.
    pub fn token_pair(&self, user_id: &str) -> Option<(String, String)> {
        self.read().ok()?.tokens.get(user_id).cloned()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn warehouse_available(&self, warehouse_id: DbId) -> Result<bool, StoreError> {
        self.read()?
            .warehouses
            .get(&warehouse_id)
            .copied()
            .ok_or(StoreError::NotFound)
    }

    async fn left_count(&self, warehouse_id: DbId, product_code: &str) -> Result<i32, StoreError> {
        self.read()?
            .stock
            .get(&(warehouse_id, product_code.to_string()))
            .copied()
            .ok_or(StoreError::NotFound)
    }

    async fn take_stock(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<bool, StoreError> {
        let mut inner = self.write()?;
        let left = inner
            .stock
            .get_mut(&(warehouse_id, product_code.to_string()))
            .ok_or(StoreError::NotFound)?;
        if *left < count {
            return Ok(false);
        }
        *left -= count;
        Ok(true)
    }

    async fn restock(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let left = inner
            .stock
            .get_mut(&(warehouse_id, product_code.to_string()))
            .ok_or(StoreError::NotFound)?;
        *left = left
            .checked_add(count)
            .ok_or_else(|| StoreError::Backend("stock counter overflow".to_string()))?;
        Ok(())
    }

    async fn create_reservation(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<DbId, StoreError> {
        let mut inner = self.write()?;
        inner.next_reservation_id += 1;
        let id = inner.next_reservation_id;
        inner.reservations.insert(
            id,
            Reservation {
                id,
                warehouse_id,
                product_code: product_code.to_string(),
                count,
            },
        );
        Ok(id)
    }

    async fn delete_reservation(&self, reservation_id: DbId) -> Result<Reservation, StoreError> {
        self.write()?
            .reservations
            .remove(&reservation_id)
            .ok_or(StoreError::NotFound)
    }

    async fn warehouse_by_reservation(&self, reservation_id: DbId) -> Result<DbId, StoreError> {
        self.read()?
            .reservations
            .get(&reservation_id)
            .map(|r| r.warehouse_id)
            .ok_or(StoreError::NotFound)
    }

    async fn product_codes(&self, warehouse_id: DbId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read()?
            .stock
            .keys()
            .filter(|(w, _)| *w == warehouse_id)
            .map(|(_, code)| code.clone())
            .collect())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn user_by_login(&self, login: &str) -> Result<User, StoreError> {
        self.read()?
            .users
            .values()
            .find(|u| u.login == login)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_user(
        &self,
        id: &str,
        login: &str,
        password_hash: &str,
        role: i16,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if inner.users.values().any(|u| u.login == login) {
            return Err(StoreError::Duplicate(format!("login {login}")));
        }
        inner.users.insert(
            id.to_string(),
            User {
                id: id.to_string(),
                login: login.to_string(),
                password_hash: password_hash.to_string(),
            },
        );
        inner.roles.insert(id.to_string(), role);
        Ok(())
    }

    async fn set_user_role(&self, user_id: &str, role: i16) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if !inner.users.contains_key(user_id) {
            return Err(StoreError::NotFound);
        }
        inner.roles.insert(user_id.to_string(), role);
        Ok(())
    }

    async fn user_role(&self, user_id: &str) -> Result<i16, StoreError> {
        self.read()?
            .roles
            .get(user_id)
            .copied()
            .ok_or(StoreError::NotFound)
    }

    async fn upsert_tokens(
        &self,
        user_id: &str,
        access: &str,
        refresh: &str,
    ) -> Result<(), StoreError> {
        self.write()?
            .tokens
            .insert(user_id.to_string(), (access.to_string(), refresh.to_string()));
        Ok(())
    }

    async fn update_access_token(&self, user_id: &str, access: &str) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let pair = inner.tokens.get_mut(user_id).ok_or(StoreError::NotFound)?;
        pair.0 = access.to_string();
        Ok(())
    }

    async fn refresh_token(&self, user_id: &str) -> Result<String, StoreError> {
        self.read()?
            .tokens
            .get(user_id)
            .map(|(_, refresh)| refresh.clone())
            .ok_or(StoreError::NotFound)
    }
}
