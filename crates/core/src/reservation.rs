//! Batch reservation engine.
//!
//! A batch is gated once on warehouse availability; after the gate every item
//! is its own unit of work and failures are reported per item instead of
//! aborting the batch. Items run sequentially in input order, so duplicate
//! product codes in one batch observe each other's decrements.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::storage::{InventoryStore, StoreError};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Errors and per-item failure reasons
// ---------------------------------------------------------------------------

/// Whole-batch failure raised by the availability gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReservationError {
    #[error("invalid warehouse id")]
    InvalidWarehouse,

    #[error("warehouse is unavailable")]
    WarehouseUnavailable,
}

impl From<ReservationError> for CoreError {
    fn from(err: ReservationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Why a single item of a batch did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemFailure {
    #[serde(rename = "invalid unique code")]
    InvalidUniqueCode,
    #[serde(rename = "invalid count")]
    InvalidCount,
    #[serde(rename = "not enough product")]
    NotEnoughProduct,
    #[serde(rename = "non-existent reservation id")]
    NonExistReservationId,
    #[serde(rename = "warehouse is unavailable")]
    WarehouseUnavailable,
    #[serde(rename = "internal error")]
    Internal,
}

impl ItemFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemFailure::InvalidUniqueCode => "invalid unique code",
            ItemFailure::InvalidCount => "invalid count",
            ItemFailure::NotEnoughProduct => "not enough product",
            ItemFailure::NonExistReservationId => "non-existent reservation id",
            ItemFailure::WarehouseUnavailable => "warehouse is unavailable",
            ItemFailure::Internal => "internal error",
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Batch inputs and outcomes
// ---------------------------------------------------------------------------

/// One requested `(product_code, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveItem {
    pub product_code: String,
    pub count: i32,
}

impl ReserveItem {
    pub fn new(product_code: impl Into<String>, count: i32) -> Self {
        Self {
            product_code: product_code.into(),
            count,
        }
    }
}

/// A reservation created by a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservedItem {
    pub id: DbId,
    pub unique_code: String,
}

/// Result of [`ReservationEngine::reserve`]. `unsuccessful[i]` failed because
/// of `errors[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReserveOutcome {
    pub successful: Vec<ReservedItem>,
    pub unsuccessful: Vec<String>,
    pub errors: Vec<ItemFailure>,
}

impl ReserveOutcome {
    fn fail(&mut self, product_code: &str, reason: ItemFailure) {
        self.unsuccessful.push(product_code.to_string());
        self.errors.push(reason);
    }
}

/// Result of [`ReservationEngine::free`]. `unsuccessful[i]` failed because of
/// `errors[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FreeOutcome {
    pub successful: Vec<DbId>,
    pub unsuccessful: Vec<DbId>,
    pub errors: Vec<ItemFailure>,
}

impl FreeOutcome {
    fn fail(&mut self, reservation_id: DbId, reason: ItemFailure) {
        self.unsuccessful.push(reservation_id);
        self.errors.push(reason);
    }
}

/// What happens to reserved units when a reservation is freed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Freed units stay consumed.
    #[default]
    Retain,
    /// Freed units are added back to the stock line.
    Restock,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct ReservationEngine {
    store: Arc<dyn InventoryStore>,
    policy: ReleasePolicy,
}

impl ReservationEngine {
    pub fn new(store: Arc<dyn InventoryStore>, policy: ReleasePolicy) -> Self {
        Self { store, policy }
    }

    /// Reserve each item against `warehouse_id`.
    ///
    /// Fails as a whole only when the warehouse check errors or reports the
    /// warehouse unavailable; nothing is mutated in that case.
    pub async fn reserve(
        &self,
        warehouse_id: DbId,
        items: &[ReserveItem],
    ) -> Result<ReserveOutcome, ReservationError> {
        tracing::info!(warehouse_id, items = items.len(), "reserving products");

        match self.store.warehouse_available(warehouse_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(warehouse_id, "reserve rejected: warehouse unavailable");
                return Err(ReservationError::WarehouseUnavailable);
            }
            Err(e) => {
                tracing::warn!(
                    warehouse_id,
                    error = %e,
                    "reserve rejected: warehouse check failed"
                );
                return Err(ReservationError::InvalidWarehouse);
            }
        }

        let mut outcome = ReserveOutcome::default();
        for item in items {
            match self.reserve_one(warehouse_id, item).await {
                Ok(id) => outcome.successful.push(ReservedItem {
                    id,
                    unique_code: item.product_code.clone(),
                }),
                Err(reason) => outcome.fail(&item.product_code, reason),
            }
        }

        tracing::info!(
            warehouse_id,
            successful = outcome.successful.len(),
            unsuccessful = outcome.unsuccessful.len(),
            "reserve finished"
        );
        Ok(outcome)
    }

    /// Free each reservation independently.
    pub async fn free(&self, reservation_ids: &[DbId]) -> FreeOutcome {
        tracing::info!(reservations = reservation_ids.len(), "freeing reservations");

        let mut outcome = FreeOutcome::default();
        for &id in reservation_ids {
            match self.free_one(id).await {
                Ok(()) => outcome.successful.push(id),
                Err(reason) => outcome.fail(id, reason),
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Per-item steps
    // -----------------------------------------------------------------------

    async fn reserve_one(
        &self,
        warehouse_id: DbId,
        item: &ReserveItem,
    ) -> Result<DbId, ItemFailure> {
        let code = item.product_code.as_str();
        if item.count <= 0 {
            return Err(ItemFailure::InvalidCount);
        }

        let left = self
            .store
            .left_count(warehouse_id, code)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => ItemFailure::InvalidUniqueCode,
                other => {
                    tracing::error!(warehouse_id, code, error = %other, "failed to read stock");
                    ItemFailure::Internal
                }
            })?;

        if left < item.count {
            return Err(ItemFailure::NotEnoughProduct);
        }

        // Decrement before creating the reservation so a reservation never
        // outlives its backing stock.
        match self.store.take_stock(warehouse_id, code, item.count).await {
            Ok(true) => {}
            Ok(false) => return Err(ItemFailure::NotEnoughProduct),
            Err(e) => {
                tracing::error!(warehouse_id, code, error = %e, "failed to decrement stock");
                return Err(ItemFailure::Internal);
            }
        }

        match self
            .store
            .create_reservation(warehouse_id, code, item.count)
            .await
        {
            Ok(id) => Ok(id),
            Err(e) => {
                tracing::error!(warehouse_id, code, error = %e, "failed to create reservation");
                if let Err(e) = self.store.restock(warehouse_id, code, item.count).await {
                    tracing::error!(
                        warehouse_id,
                        code,
                        count = item.count,
                        error = %e,
                        "failed to return stock after reservation failure"
                    );
                }
                Err(ItemFailure::Internal)
            }
        }
    }

    async fn free_one(&self, reservation_id: DbId) -> Result<(), ItemFailure> {
        let warehouse_id = self
            .store
            .warehouse_by_reservation(reservation_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => ItemFailure::NonExistReservationId,
                other => {
                    tracing::error!(
                        reservation_id,
                        error = %other,
                        "failed to look up reservation"
                    );
                    ItemFailure::Internal
                }
            })?;

        match self.store.warehouse_available(warehouse_id).await {
            Ok(true) => {}
            Ok(false) => return Err(ItemFailure::WarehouseUnavailable),
            Err(e) => {
                tracing::error!(warehouse_id, error = %e, "failed to check warehouse");
                return Err(ItemFailure::Internal);
            }
        }

        let freed = self
            .store
            .delete_reservation(reservation_id)
            .await
            .map_err(|e| match e {
                // Freed concurrently between lookup and delete.
                StoreError::NotFound => ItemFailure::NonExistReservationId,
                other => {
                    tracing::error!(reservation_id, error = %other, "failed to delete reservation");
                    ItemFailure::Internal
                }
            })?;

        if self.policy == ReleasePolicy::Restock {
            if let Err(e) = self
                .store
                .restock(freed.warehouse_id, &freed.product_code, freed.count)
                .await
            {
                tracing::error!(
                    reservation_id,
                    code = %freed.product_code,
                    count = freed.count,
                    error = %e,
                    "reservation freed but stock was not returned"
                );
            }
        }

        Ok(())
    }
}
