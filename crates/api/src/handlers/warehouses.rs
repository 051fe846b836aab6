//! Handlers for the `/warehouses` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stockroom_core::catalog::CatalogError;
use stockroom_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireWarehouseWorker;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/warehouses/{id}/products
///
/// Product codes stocked in the warehouse. An empty (or unknown) warehouse
/// answers 204 No Content.
pub async fn list_products(
    State(state): State<AppState>,
    RequireWarehouseWorker(_user): RequireWarehouseWorker,
    Path(warehouse_id): Path<DbId>,
) -> AppResult<Response> {
    if warehouse_id < 1 {
        return Err(AppError::BadRequest("invalid warehouse id".into()));
    }

    match state.catalog.products(warehouse_id).await {
        Ok(codes) => Ok(Json(DataResponse { data: codes }).into_response()),
        Err(CatalogError::NoProducts(_)) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => Err(e.into()),
    }
}
