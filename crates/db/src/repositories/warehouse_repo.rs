//! Repository for the `warehouses` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

/// Provides read operations for warehouses.
pub struct WarehouseRepo;

impl WarehouseRepo {
    /// The availability flag of a warehouse, or `None` if it does not exist.
    pub async fn is_available(pool: &PgPool, id: DbId) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT available FROM warehouses WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
