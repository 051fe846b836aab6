//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! admitted by [`roles::authorize`]. Admin passes every check.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use stockroom_core::error::CoreError;
use stockroom_core::roles::{self, Role};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate the caller and check its role against `required`.
async fn require(
    parts: &mut Parts,
    state: &AppState,
    required: &[Role],
    denied: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if !roles::authorize(required, user.role) {
        tracing::debug!(user_id = %user.user_id, role = %user.role, "access denied");
        return Err(AppError::Core(CoreError::Forbidden(denied.into())));
    }
    Ok(user)
}

/// Requires a product worker or warehouse worker (or admin).
///
/// ```ignore
/// async fn reserve(RequireWorker(user): RequireWorker) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireWorker(pub AuthUser);

impl FromRequestParts<AppState> for RequireWorker {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(
            parts,
            state,
            &[Role::ProductWorker, Role::WarehouseWorker],
            "Worker role required",
        )
        .await
        .map(RequireWorker)
    }
}

/// Requires a warehouse worker (or admin).
pub struct RequireWarehouseWorker(pub AuthUser);

impl FromRequestParts<AppState> for RequireWarehouseWorker {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(
            parts,
            state,
            &[Role::WarehouseWorker],
            "Warehouse worker role required",
        )
        .await
        .map(RequireWarehouseWorker)
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for route
/// definitions where "this route requires authentication" should be
/// self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require(parts, state, &[], "Authentication required")
            .await
            .map(RequireAuth)
    }
}
