//! Repository for the `reservations` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::reservation::ReservationRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, warehouse_id, product_code, count, created_at";

/// Provides create / delete / lookup for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a reservation, returning its id.
    pub async fn create(
        pool: &PgPool,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO reservations (warehouse_id, product_code, count)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(warehouse_id)
        .bind(product_code)
        .bind(count)
        .fetch_one(pool)
        .await
    }

    /// Delete a reservation, returning the removed row if it existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<ReservationRow>, sqlx::Error> {
        let query = format!("DELETE FROM reservations WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ReservationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The warehouse owning a reservation, or `None` if it does not exist.
    pub async fn warehouse_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT warehouse_id FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
