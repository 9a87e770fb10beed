//! Server module
//!
//! Configuration, shared state, and the HTTP server entry point.

mod config;
mod state;

pub use config::Config;
pub use state::ServerState;

use std::net::SocketAddr;

use crate::routes;
use crate::utils::AppError;

/// HTTP server wrapper
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<(), AppError> {
        let app = routes::build_app(&self.state).with_state(self.state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "HTTP server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))
    }
}
