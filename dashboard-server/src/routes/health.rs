use axum::Router;
use axum::routing::get;

use crate::handler::health;
use crate::server::ServerState;

/// Health router - public route
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/v1/health", get(health::health))
}
