use axum::Router;
use axum::routing::{get, post};

use crate::auth::middleware::require_admin;
use crate::handler::{auth, user};
use crate::server::ServerState;

/// User router
/// - /api/v1/users/me: any authenticated user
/// - everything else: admin access required
pub fn router() -> Router<ServerState> {
    let admin = Router::new()
        .route("/api/v1/users", get(user::list).post(user::create))
        .route(
            "/api/v1/users/{id}",
            get(user::get_by_id).put(user::update).delete(user::delete),
        )
        .route("/api/v1/users/{id}/roles", get(user::list_roles))
        .route(
            "/api/v1/users/{id}/roles/{role_id}",
            post(user::assign_role).delete(user::remove_role),
        )
        .route_layer(axum::middleware::from_fn(require_admin));

    Router::new()
        .route("/api/v1/users/me", get(auth::me))
        .merge(admin)
}
