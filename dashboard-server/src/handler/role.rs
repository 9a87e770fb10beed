//! Role Handlers
//!
//! Admin-gated role CRUD. Deleting a role that still has user assignments
//! is rejected with a conflict; its section permissions go with it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use shared::models::{Role, RoleCreate, RoleUpdate};

use crate::db::repository::role;
use crate::server::ServerState;
use crate::utils::{AppError, AppResult};

/// List all roles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    let roles = role::find_all(state.pool()).await?;
    Ok(Json(roles))
}

/// Get role by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Role>> {
    let found = role::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role {id} not found")))?;
    Ok(Json(found))
}

/// Create a new role
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<(StatusCode, Json<Role>)> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Role name must not be empty"));
    }

    let created = role::create(state.pool(), payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a role
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    let updated = role::update(state.pool(), id, payload).await?;
    Ok(Json(updated))
}

/// Delete a role if no assignment references it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let result = role::delete(state.pool(), id).await?;
    Ok(Json(result))
}
