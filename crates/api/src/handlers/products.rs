//! Handlers for batch reservation (`/products/reserve`, `/products/free`).
//!
//! Batch endpoints report per-item results. The status reflects the mix:
//! every item succeeded -> 200 `{successful}`, none did -> 400
//! `{unsuccessful, errors}`, mixed -> 207 with all three lists.

use std::borrow::Cow;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use stockroom_core::reservation::{ItemFailure, ReserveItem};
use stockroom_core::types::DbId;
use validator::{Validate, ValidationError};

use crate::error::AppResult;
use crate::middleware::rbac::RequireWorker;
use crate::state::AppState;

const LACK_OF_DATA: &str = "lack of data";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /products/reserve`. `unique_codes[i]` is reserved
/// `counts[i]` times.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_reserve_lists"))]
pub struct ReserveRequest {
    #[validate(range(min = 1, message = "invalid warehouse id"))]
    pub warehouse_id: DbId,
    #[validate(length(min = 1, message = "lack of data"))]
    pub unique_codes: Vec<String>,
    #[validate(length(min = 1, message = "lack of data"))]
    pub counts: Vec<i32>,
}

fn validate_reserve_lists(req: &ReserveRequest) -> Result<(), ValidationError> {
    if req.unique_codes.len() != req.counts.len() {
        let mut err = ValidationError::new("length_mismatch");
        err.message = Some(Cow::Borrowed(LACK_OF_DATA));
        return Err(err);
    }
    Ok(())
}

/// Request body for `POST /products/free`.
#[derive(Debug, Deserialize, Validate)]
pub struct FreeRequest {
    #[validate(length(min = 1, message = "lack of data"))]
    pub id: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/products/reserve
pub async fn reserve(
    State(state): State<AppState>,
    RequireWorker(user): RequireWorker,
    Json(input): Json<ReserveRequest>,
) -> AppResult<Response> {
    input.validate()?;

    let items: Vec<ReserveItem> = input
        .unique_codes
        .into_iter()
        .zip(input.counts)
        .map(|(code, count)| ReserveItem::new(code, count))
        .collect();

    tracing::debug!(user_id = %user.user_id, warehouse_id = input.warehouse_id, "reserve request");
    let outcome = state
        .reservations
        .reserve(input.warehouse_id, &items)
        .await?;

    Ok(batch_response(
        outcome.successful,
        outcome.unsuccessful,
        outcome.errors,
    ))
}

/// POST /api/v1/products/free
pub async fn free(
    State(state): State<AppState>,
    RequireWorker(user): RequireWorker,
    Json(input): Json<FreeRequest>,
) -> AppResult<Response> {
    input.validate()?;

    tracing::debug!(user_id = %user.user_id, reservations = input.id.len(), "free request");
    let outcome = state.reservations.free(&input.id).await;

    Ok(batch_response(
        outcome.successful,
        outcome.unsuccessful,
        outcome.errors,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn batch_response<S, U>(
    successful: Vec<S>,
    unsuccessful: Vec<U>,
    errors: Vec<ItemFailure>,
) -> Response
where
    S: Serialize,
    U: Serialize,
{
    if unsuccessful.is_empty() {
        return (StatusCode::OK, Json(json!({ "successful": successful }))).into_response();
    }

    if successful.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "unsuccessful": unsuccessful, "errors": errors })),
        )
            .into_response();
    }

    (
        StatusCode::MULTI_STATUS,
        Json(json!({
            "successful": successful,
            "unsuccessful": unsuccessful,
            "errors": errors,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lists_fail_validation() {
        let req = ReserveRequest {
            warehouse_id: 1,
            unique_codes: vec!["a".into(), "b".into()],
            counts: vec![1],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_warehouse_id_fails_validation() {
        let req = ReserveRequest {
            warehouse_id: 0,
            unique_codes: vec!["a".into()],
            counts: vec![1],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn non_positive_counts_pass_validation() {
        let req = ReserveRequest {
            warehouse_id: 1,
            unique_codes: vec!["a".into()],
            counts: vec![0],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn batch_status_follows_the_mix() {
        let all_ok = batch_response(vec![1_i64], Vec::<i64>::new(), vec![]);
        assert_eq!(all_ok.status(), StatusCode::OK);

        let none_ok = batch_response(
            Vec::<i64>::new(),
            vec![2_i64],
            vec![ItemFailure::NonExistReservationId],
        );
        assert_eq!(none_ok.status(), StatusCode::BAD_REQUEST);

        let mixed = batch_response(
            vec![1_i64],
            vec![2_i64],
            vec![ItemFailure::NonExistReservationId],
        );
        assert_eq!(mixed.status(), StatusCode::MULTI_STATUS);
    }
}
