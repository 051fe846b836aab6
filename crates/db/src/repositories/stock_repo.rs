//! Repository for the `warehouse_products` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

/// Provides stock-line reads and counter updates.
pub struct StockRepo;

impl StockRepo {
    /// Units left on a stock line, or `None` if the line does not exist.
    pub async fn left_count(
        pool: &PgPool,
        warehouse_id: DbId,
        product_code: &str,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT left_count FROM warehouse_products
             WHERE warehouse_id = $1 AND product_code = $2",
        )
        .bind(warehouse_id)
        .bind(product_code)
        .fetch_optional(pool)
        .await
    }

    /// Decrement a stock line by `count` only if at least `count` units are left.
    ///
    /// Returns `true` if the row was updated. The condition and the write are
    /// one statement, so concurrent callers cannot oversell.
    pub async fn take(
        pool: &PgPool,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE warehouse_products SET left_count = left_count - $3
             WHERE warehouse_id = $1 AND product_code = $2 AND left_count >= $3",
        )
        .bind(warehouse_id)
        .bind(product_code)
        .bind(count)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add `count` units to a stock line. Returns `true` if the line exists.
    pub async fn add(
        pool: &PgPool,
        warehouse_id: DbId,
        product_code: &str,
        count: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE warehouse_products SET left_count = left_count + $3
             WHERE warehouse_id = $1 AND product_code = $2",
        )
        .bind(warehouse_id)
        .bind(product_code)
        .bind(count)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Product codes stocked in a warehouse, ordered by code.
    pub async fn product_codes(
        pool: &PgPool,
        warehouse_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT product_code FROM warehouse_products
             WHERE warehouse_id = $1
             ORDER BY product_code ASC",
        )
        .bind(warehouse_id)
        .fetch_all(pool)
        .await
    }
}
