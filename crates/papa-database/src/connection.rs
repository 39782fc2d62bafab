//! Database connection management

use papa_core::{DatabaseConfig, ServiceError, ServiceResult};
use papa_migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub type DbConnection = DatabaseConnection;

/// Pool options for the given config. SQL statement logging is left to
/// `RUST_LOG=sea_orm=debug` rather than always on.
pub fn connect_options(config: &DatabaseConfig) -> ConnectOptions {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    opt
}

pub async fn establish_connection(config: &DatabaseConfig) -> ServiceResult<Arc<DbConnection>> {
    config.validate()?;

    debug!(
        "Connecting to database (max_connections={}, min_connections={})",
        config.max_connections, config.min_connections
    );
    let db = Database::connect(connect_options(config))
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    // Run migrations
    Migrator::up(&db, None)
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;
    info!("Database migrations applied");

    Ok(Arc::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_uses_pool_sizes() {
        let config = DatabaseConfig::new("postgres://localhost/papa").with_pool(Some(8), Some(3));
        let opt = connect_options(&config);
        assert_eq!(opt.get_url(), "postgres://localhost/papa");
        assert_eq!(opt.get_max_connections(), Some(8));
        assert_eq!(opt.get_min_connections(), Some(3));
    }

    #[tokio::test]
    async fn test_establish_connection_rejects_invalid_config() {
        let config = DatabaseConfig::new("sqlite::memory:");
        let result = establish_connection(&config).await;
        assert!(matches!(
            result,
            Err(ServiceError::Configuration { .. })
        ));
    }
}
