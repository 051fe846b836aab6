use axum::routing::get;
use axum::Router;

use crate::handlers::warehouses;
use crate::state::AppState;

/// Routes mounted at `/warehouses`.
///
/// ```text
/// GET /{id}/products  -> list_products (warehouse worker)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/products", get(warehouses::list_products))
}
