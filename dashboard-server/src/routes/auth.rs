//! Authentication Routes

use axum::{Router, routing::get, routing::post};

use crate::handler::auth;
use crate::server::ServerState;

/// Build authentication router
/// - /api/v1/auth/login, /api/v1/auth/register: public (no auth required)
/// - /api/v1/auth/me: protected (requires auth)
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes - no auth middleware applied
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        // Protected route - requires authentication
        .route("/api/v1/auth/me", get(auth::me))
}
