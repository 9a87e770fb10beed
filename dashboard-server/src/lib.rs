//! Dashboard Analytics Backend
//!
//! Authentication and authorization core for the dashboard API:
//!
//! - **Database** (`db`): SQLite connection pool, migrations, repositories
//! - **Auth** (`auth`): JWT token service, Argon2 password hashing,
//!   session resolution and permission checks
//! - **HTTP API** (`routes`, `handler`): RESTful endpoints
//! - **Server** (`server`): configuration and shared state

pub mod auth;
pub mod db;
pub mod handler;
pub mod routes;
pub mod server;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtConfig, JwtService};
pub use server::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
