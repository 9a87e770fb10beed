//! Section Access Handlers
//!
//! The enforcement point for section-gated areas of the application. The
//! business endpoints behind each section live elsewhere; this probe runs
//! the same authorization they do and reports the outcome.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::auth::permissions::{self, PermissionAction};
use crate::server::ServerState;
use crate::utils::AppResult;

#[derive(Debug, Serialize)]
pub struct SectionAccessResponse {
    pub section: String,
    pub action: String,
    pub granted: bool,
}

/// View-access probe for a section.
///
/// 200 when any of the caller's roles grants view on the section, 403
/// otherwise (identifying the section and action in the message).
pub async fn view(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(section): Path<String>,
) -> AppResult<Json<SectionAccessResponse>> {
    permissions::authorize(state.pool(), &user, &section, PermissionAction::View).await?;

    Ok(Json(SectionAccessResponse {
        section,
        action: PermissionAction::View.to_string(),
        granted: true,
    }))
}

/// Edit-access probe for a section.
pub async fn edit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(section): Path<String>,
) -> AppResult<Json<SectionAccessResponse>> {
    permissions::authorize(state.pool(), &user, &section, PermissionAction::Edit).await?;

    Ok(Json(SectionAccessResponse {
        section,
        action: PermissionAction::Edit.to_string(),
        granted: true,
    }))
}
