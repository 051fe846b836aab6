use std::sync::Arc;

use stockroom_core::auth::{AuthService, TokenCodec};
use stockroom_core::catalog::WarehouseCatalog;
use stockroom_core::reservation::ReservationEngine;
use stockroom_core::storage::{InventoryStore, UserStore};
use stockroom_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (every service sits behind an `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database pool, when the services are backed by PostgreSQL. Only the
    /// health check reads it directly.
    pub pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
    pub auth: Arc<AuthService>,
    pub reservations: Arc<ReservationEngine>,
    pub catalog: Arc<WarehouseCatalog>,
}

impl AppState {
    /// Wire every service to a single storage backend.
    pub fn new<S>(config: ServerConfig, store: Arc<S>, pool: Option<DbPool>) -> Self
    where
        S: InventoryStore + UserStore + 'static,
    {
        let codec = TokenCodec::new(&config.jwt.secret);
        let auth = AuthService::new(store.clone(), codec, config.jwt.auth_config());
        let reservations = ReservationEngine::new(store.clone(), config.release_policy());
        let catalog = WarehouseCatalog::new(store);

        Self {
            pool,
            config: Arc::new(config),
            auth: Arc::new(auth),
            reservations: Arc::new(reservations),
            catalog: Arc::new(catalog),
        }
    }
}
