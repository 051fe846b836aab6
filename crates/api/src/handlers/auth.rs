//! Handlers for the `/auth` resource (login, register, refresh, role lookup).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockroom_core::error::CoreError;
use stockroom_core::roles::Role;
use stockroom_core::types::UserId;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "invalid login"))]
    pub login: String,
    #[validate(length(min = 1, message = "invalid password"))]
    pub password: String,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "invalid login"))]
    pub login: String,
    #[validate(length(min = 1, message = "invalid password"))]
    pub password: String,
    /// Role name, e.g. `"warehouse worker"`. Unknown names get the lowest role.
    #[validate(length(min = 1, message = "invalid role"))]
    pub role: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "invalid refresh token"))]
    pub refresh_token: String,
}

/// Token pair returned by login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

/// Fresh access token returned by refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub user_id: UserId,
    pub role: &'static str,
    pub code: i16,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with login + password. Returns access and refresh tokens;
/// any pair issued earlier for the same user stops refreshing.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate()?;

    let pair = state.auth.login(&input.login, &input.password).await?;

    Ok(Json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: state.auth.access_ttl_secs(),
    }))
}

/// POST /api/v1/auth/register
///
/// Create a user with the given role. Returns 201 with the new user id.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    input.validate()?;

    let user_id = state
        .auth
        .register_user(&input.login, &input.password, &input.role)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// POST /api/v1/auth/refresh
///
/// Exchange the latest refresh token for a new access token. Any failure is
/// reported as `TOKEN_TIMED_OUT`.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    input.validate()?;

    let access_token = state.auth.access_by_refresh(&input.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: state.auth.access_ttl_secs(),
    }))
}

/// GET /api/v1/auth/users/{id}/role
///
/// Look up a user's role. Callers may read their own role; admins may read
/// anyone's.
pub async fn get_role(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<DataResponse<RoleResponse>>> {
    if caller.user_id != user_id && caller.role != Role::Admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot read another user's role".into(),
        )));
    }

    let role = state.auth.get_role(&user_id).await?;

    Ok(Json(DataResponse {
        data: RoleResponse {
            user_id,
            role: role.as_str(),
            code: role.code(),
        },
    }))
}
