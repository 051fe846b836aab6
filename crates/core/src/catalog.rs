//! Read-only view of the stock lines held by a warehouse.

use std::sync::Arc;

use crate::error::CoreError;
use crate::storage::{InventoryStore, StoreError};
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The warehouse stocks nothing (or does not exist).
    #[error("no products in warehouse {0}")]
    NoProducts(DbId),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NoProducts(warehouse_id) => CoreError::NotFound {
                entity: "warehouse stock",
                id: warehouse_id.to_string(),
            },
            CatalogError::Internal(msg) => CoreError::Internal(msg),
        }
    }
}

pub struct WarehouseCatalog {
    store: Arc<dyn InventoryStore>,
}

impl WarehouseCatalog {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    /// Product codes stocked in `warehouse_id`.
    pub async fn products(&self, warehouse_id: DbId) -> Result<Vec<String>, CatalogError> {
        tracing::debug!(warehouse_id, "listing products");
        match self.store.product_codes(warehouse_id).await {
            Ok(codes) if codes.is_empty() => Err(CatalogError::NoProducts(warehouse_id)),
            Ok(codes) => Ok(codes),
            Err(StoreError::NotFound) => Err(CatalogError::NoProducts(warehouse_id)),
            Err(e) => {
                tracing::error!(warehouse_id, error = %e, "failed to list products");
                Err(CatalogError::Internal(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    #[tokio::test]
    async fn lists_codes_of_one_warehouse() {
        let store = Arc::new(MemoryStore::new());
        store.put_stock(1, "olkiuj", 5);
        store.put_stock(1, "tghyuj", 0);
        store.put_stock(2, "other", 1);

        let catalog = WarehouseCatalog::new(store);
        assert_eq!(
            catalog.products(1).await.unwrap(),
            vec!["olkiuj".to_string(), "tghyuj".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_warehouse_has_no_products() {
        let catalog = WarehouseCatalog::new(Arc::new(MemoryStore::new()));
        assert_eq!(catalog.products(3).await, Err(CatalogError::NoProducts(3)));
    }

    #[test]
    fn missing_products_name_the_warehouse() {
        let err = CoreError::from(CatalogError::NoProducts(7));
        assert_eq!(err.to_string(), "Entity not found: warehouse stock with id 7");
    }
}
