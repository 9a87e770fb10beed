use axum::Router;
use axum::routing::get;

use crate::handler::sections;
use crate::server::ServerState;

/// Section access router - any authenticated user; the handlers run the
/// per-section permission resolution themselves.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/v1/sections/{section}", get(sections::view))
        .route("/api/v1/sections/{section}/edit", get(sections::edit))
}
