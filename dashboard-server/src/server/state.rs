use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::db::DbService;
use crate::server::Config;

/// Server state — shared references held by every request handler.
///
/// Clone is shallow (`Arc` + pool handle); there is no long-lived mutable
/// state beyond the pool and the signing keys.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub db: SqlitePool,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Initialize state: open the database (running migrations) and build
    /// the token service from the configured secret.
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or migrated.
    pub async fn initialize(config: &Config) -> Self {
        let db_path = config.database_path();
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str, config.max_db_connections)
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Self::new(config.clone(), db_service.pool, jwt_service)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
