use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// Every item can be overridden through environment variables:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/dashboard | working directory (database, logs) |
/// | DATABASE_FILE | <WORK_DIR>/dashboard.db | SQLite database file |
/// | HTTP_PORT | 8000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | MAX_DB_CONNECTIONS | 5 | connection pool ceiling |
/// | JWT_SECRET | (dev fallback) | token signing secret |
/// | JWT_ALGORITHM | HS256 | token signing algorithm |
/// | JWT_EXPIRATION_MINUTES | 30 | default token TTL |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// SQLite database file; defaults to `<work_dir>/dashboard.db`
    pub database_file: Option<String>,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Connection pool ceiling
    pub max_db_connections: u32,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dashboard".into()),
            database_file: std::env::var("DATABASE_FILE").ok(),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            max_db_connections: std::env::var("MAX_DB_CONNECTIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Resolved database file path.
    pub fn database_path(&self) -> PathBuf {
        match &self.database_file {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.work_dir).join("dashboard.db"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
