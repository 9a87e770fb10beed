use axum::Router;
use axum::routing::{get, put};

use crate::auth::middleware::require_admin;
use crate::handler::section_permission;
use crate::server::ServerState;

/// Section permission router - requires authentication and admin access
pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/v1/permissions/check",
            get(section_permission::check),
        )
        .route(
            "/api/v1/permissions/roles/{role_id}",
            get(section_permission::list_for_role),
        )
        .route(
            "/api/v1/permissions/roles/{role_id}/sections/{section}",
            put(section_permission::set).delete(section_permission::delete),
        )
        .route_layer(axum::middleware::from_fn(require_admin))
}
