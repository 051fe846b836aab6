//! PostgreSQL implementation of the core storage port.

use async_trait::async_trait;
use stockroom_core::storage::{InventoryStore, Reservation, StoreError, User, UserStore};
use stockroom_core::types::DbId;

use crate::repositories::{ReservationRepo, StockRepo, TokenRepo, UserRepo, WarehouseRepo};
use crate::DbPool;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Storage port backed by a shared sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Classify a sqlx error for the storage port.
///
/// - `RowNotFound` maps to `NotFound`.
/// - Unique constraint violations (constraint name starting with `uq_`) map to `Duplicate`.
/// - Everything else maps to `Backend`.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                StoreError::Duplicate(constraint.to_string())
            } else {
                tracing::error!(error = %db_err, "Database error");
                StoreError::Backend(db_err.to_string())
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            StoreError::Backend(other.to_string())
        }
    }
}

/// Turn a missing optional row into `NotFound`.
fn found<T>(row: Result<Option<T>, sqlx::Error>) -> Result<T, StoreError> {
    row.map_err(map_sqlx_error)?.ok_or(StoreError::NotFound)
}

/// Turn "no row updated" into `NotFound`.
fn touched(updated: Result<bool, sqlx::Error>) -> Result<(), StoreError> {
    if updated.map_err(map_sqlx_error)? {
        Ok(())
    } else {
        Err(StoreError::NotFound)
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn warehouse_available(&self, warehouse_id: DbId) -> Result<bool, StoreError> {
        found(WarehouseRepo::is_available(&self.pool, warehouse_id).await)
    }

    async fn left_count(&self, warehouse_id: DbId, product_code: &str) -> Result<i32, StoreError> {
        found(StockRepo::left_count(&self.pool, warehouse_id, product_code).await)
    }

    async fn take_stock(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<bool, StoreError> {
        StockRepo::take(&self.pool, warehouse_id, product_code, count)
            .await
            .map_err(map_sqlx_error)
    }

    async fn restock(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<(), StoreError> {
        touched(StockRepo::add(&self.pool, warehouse_id, product_code, count).await)
    }

    async fn create_reservation(
        &self,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<DbId, StoreError> {
        ReservationRepo::create(&self.pool, warehouse_id, product_code, count)
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete_reservation(&self, reservation_id: DbId) -> Result<Reservation, StoreError> {
        found(ReservationRepo::delete(&self.pool, reservation_id).await).map(Reservation::from)
    }

    async fn warehouse_by_reservation(&self, reservation_id: DbId) -> Result<DbId, StoreError> {
        found(ReservationRepo::warehouse_id(&self.pool, reservation_id).await)
    }

    async fn product_codes(&self, warehouse_id: DbId) -> Result<Vec<String>, StoreError> {
        StockRepo::product_codes(&self.pool, warehouse_id)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn user_by_login(&self, login: &str) -> Result<User, StoreError> {
        found(UserRepo::find_by_login(&self.pool, login).await).map(User::from)
    }

    async fn create_user(
        &self,
        id: &str,
        login: &str,
        password_hash: &str,
        role: i16,
    ) -> Result<(), StoreError> {
        UserRepo::create(&self.pool, id, login, password_hash, role)
            .await
            .map_err(map_sqlx_error)
    }

    async fn set_user_role(&self, user_id: &str, role: i16) -> Result<(), StoreError> {
        touched(UserRepo::set_role(&self.pool, user_id, role).await)
    }

    async fn user_role(&self, user_id: &str) -> Result<i16, StoreError> {
        found(UserRepo::role(&self.pool, user_id).await)
    }

    async fn upsert_tokens(
        &self,
        user_id: &str,
        access: &str,
        refresh: &str,
    ) -> Result<(), StoreError> {
        TokenRepo::upsert(&self.pool, user_id, access, refresh)
            .await
            .map_err(map_sqlx_error)
    }

    async fn update_access_token(&self, user_id: &str, access: &str) -> Result<(), StoreError> {
        touched(TokenRepo::update_access(&self.pool, user_id, access).await)
    }

    async fn refresh_token(&self, user_id: &str) -> Result<String, StoreError> {
        found(TokenRepo::refresh_token(&self.pool, user_id).await)
    }
}
