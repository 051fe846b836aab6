//! Reservation entity model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use stockroom_core::storage::Reservation;
use stockroom_core::types::DbId;

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationRow {
    pub id: DbId,
    pub warehouse_id: DbId,
    pub product_code: String,
    pub count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            id: row.id,
            warehouse_id: row.warehouse_id,
            product_code: row.product_code,
            count: row.count,
        }
    }
}
