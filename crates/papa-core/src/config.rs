//! Configuration management utilities

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::{ServiceError, ServiceResult};

pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 2;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Build a config with the default pool sizes
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
        }
    }

    pub fn with_pool(mut self, max_connections: Option<u32>, min_connections: Option<u32>) -> Self {
        if let Some(max) = max_connections {
            self.max_connections = max;
        }
        if let Some(min) = min_connections {
            self.min_connections = min;
        }
        self
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ServiceError::Configuration {
                message: "database url must use the postgres:// or postgresql:// scheme"
                    .to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ServiceError::Configuration {
                message: "max_connections must be greater than zero".to_string(),
            });
        }
        if self.min_connections > self.max_connections {
            return Err(ServiceError::Configuration {
                message: format!(
                    "min_connections ({}) exceeds max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub database: DatabaseConfig,
}

impl ServerConfig {
    pub fn new(address: impl Into<String>, database: DatabaseConfig) -> ServiceResult<Self> {
        let config = Self {
            address: address.into(),
            database,
        };
        config.socket_addr()?;
        config.database.validate()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> ServiceResult<SocketAddr> {
        self.address
            .parse()
            .map_err(|e| ServiceError::Configuration {
                message: format!("invalid bind address '{}': {}", self.address, e),
            })
    }
}
