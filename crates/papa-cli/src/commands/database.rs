use clap::Args;
use papa_core::DatabaseConfig;

/// Connection flags shared by every command that touches Postgres
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database connection URL
    #[arg(long, env = "PAPA_DATABASE_URL")]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "PAPA_DB_MAX_CONNECTIONS")]
    pub db_max_connections: Option<u32>,

    /// Minimum idle pooled connections
    #[arg(long, env = "PAPA_DB_MIN_CONNECTIONS")]
    pub db_min_connections: Option<u32>,
}

impl DatabaseArgs {
    pub fn config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .with_pool(self.db_max_connections, self.db_min_connections)
    }
}
