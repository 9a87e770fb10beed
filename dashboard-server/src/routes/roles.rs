use axum::Router;
use axum::routing::get;

use crate::auth::middleware::require_admin;
use crate::handler::role;
use crate::server::ServerState;

/// Role router - requires authentication and admin access
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/v1/roles", get(role::list).post(role::create))
        .route(
            "/api/v1/roles/{id}",
            get(role::get_by_id).put(role::update).delete(role::delete),
        )
        .route_layer(axum::middleware::from_fn(require_admin))
}
