//! User Administration Handlers
//!
//! Admin-gated user CRUD plus role assignment.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::ValidateEmail;

use shared::models::{Role, UserCreate, UserResponse, UserRole, UserUpdate};

use crate::db::repository::user;
use crate::server::ServerState;
use crate::utils::{AppError, AppResult};

/// List all users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::find_all(state.pool()).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// Get user by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let found = user::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(UserResponse::from(&found)))
}

/// Create a new user (admin creation, no default role assignment)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    if !payload.email.validate_email() {
        return Err(AppError::validation(format!(
            "Invalid email address: {}",
            payload.email
        )));
    }

    let created = user::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&created))))
}

/// Update a user (including the administrative is_active / is_verified flags)
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    if let Some(ref email) = payload.email
        && !email.validate_email()
    {
        return Err(AppError::validation(format!("Invalid email address: {email}")));
    }

    let updated = user::update(state.pool(), id, payload).await?;
    Ok(Json(UserResponse::from(&updated)))
}

/// Delete a user (assignments are removed with it)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = user::delete(state.pool(), id).await?;
    Ok(Json(result))
}

/// Roles assigned to a user
pub async fn list_roles(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Role>>> {
    if user::find_by_id(state.pool(), id).await?.is_none() {
        return Err(AppError::not_found(format!("User {id} not found")));
    }
    let roles = user::roles_of(state.pool(), id).await?;
    Ok(Json(roles))
}

/// Assign a role to a user
pub async fn assign_role(
    State(state): State<ServerState>,
    Path((id, role_id)): Path<(i64, i64)>,
) -> AppResult<(StatusCode, Json<UserRole>)> {
    let assignment = user::assign_role(state.pool(), id, role_id).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Remove a role from a user
pub async fn remove_role(
    State(state): State<ServerState>,
    Path((id, role_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let removed = user::remove_role(state.pool(), id, role_id).await?;
    Ok(Json(removed))
}
