pub mod auth;
pub mod health;
pub mod products;
pub mod warehouses;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                      login (public)
/// /auth/register                   register (public)
/// /auth/refresh                    refresh (public)
/// /auth/users/{id}/role            role lookup (self or admin)
///
/// /products/reserve                batch reserve (workers)
/// /products/free                   batch free (workers)
///
/// /warehouses/{id}/products        stocked product codes (warehouse worker)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/warehouses", warehouses::router())
}
