//! Route definitions for batch reservation.

use axum::routing::post;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// POST /reserve  -> reserve (product or warehouse worker)
/// POST /free     -> free (product or warehouse worker)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reserve", post(products::reserve))
        .route("/free", post(products::free))
}
