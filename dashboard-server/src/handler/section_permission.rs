//! Section Permission Handlers
//!
//! Admin-gated management of the per-(role, section) view/edit grants.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::models::{SectionPermission, SetPermissionRequest};

use crate::auth::permissions::{self, PermissionAction};
use crate::db::repository::section_permission;
use crate::server::ServerState;
use crate::utils::{AppError, AppResult};

/// Explicit permission check query
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub role_id: i64,
    pub section: String,
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub role_id: i64,
    pub section: String,
    pub action: String,
    pub granted: bool,
}

/// All grants of a role
pub async fn list_for_role(
    State(state): State<ServerState>,
    Path(role_id): Path<i64>,
) -> AppResult<Json<Vec<SectionPermission>>> {
    let permissions = section_permission::list_by_role(state.pool(), role_id).await?;
    Ok(Json(permissions))
}

/// Set (upsert) the grant for a (role, section) pair
pub async fn set(
    State(state): State<ServerState>,
    Path((role_id, section)): Path<(i64, String)>,
    Json(payload): Json<SetPermissionRequest>,
) -> AppResult<Json<SectionPermission>> {
    let permission = section_permission::set(
        state.pool(),
        role_id,
        &section,
        payload.can_view,
        payload.can_edit,
    )
    .await?;
    Ok(Json(permission))
}

/// Remove the grant for a (role, section) pair; absence is not an error
pub async fn delete(
    State(state): State<ServerState>,
    Path((role_id, section)): Path<(i64, String)>,
) -> AppResult<Json<bool>> {
    let removed =
        section_permission::delete_by_role_and_section(state.pool(), role_id, &section).await?;
    Ok(Json(removed))
}

/// Explicit check: does a role have `action` on `section`?
///
/// A missing grant reads as denied; an action other than view/edit is a
/// validation error.
pub async fn check(
    State(state): State<ServerState>,
    Query(query): Query<CheckQuery>,
) -> AppResult<Json<CheckResponse>> {
    let action = PermissionAction::parse(&query.action).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid action: {}. Must be 'view' or 'edit'",
            query.action
        ))
    })?;

    let granted = permissions::check(state.pool(), query.role_id, &query.section, action).await?;

    Ok(Json(CheckResponse {
        role_id: query.role_id,
        section: query.section,
        action: query.action,
        granted,
    }))
}
