//! Shared response envelope types for API handlers.
//!
//! Single-resource reads use a `{ "data": ... }` envelope. Batch endpoints
//! return their outcome lists at the top level instead.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: codes }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
