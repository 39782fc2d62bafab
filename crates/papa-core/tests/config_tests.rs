use papa_core::config::{DatabaseConfig, ServerConfig, DEFAULT_MAX_CONNECTIONS};
use papa_core::ServiceError;

#[test]
fn test_database_config_serialization() {
    let config = DatabaseConfig {
        url: "postgresql://localhost:5432/papa".to_string(),
        max_connections: 10,
        min_connections: 1,
    };

    let serialized = serde_json::to_string(&config).unwrap();
    assert!(serialized.contains("postgresql://localhost:5432/papa"));

    let deserialized: DatabaseConfig = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized.url, config.url);
    assert_eq!(deserialized.max_connections, 10);
    assert_eq!(deserialized.min_connections, 1);
}

#[test]
fn test_database_config_pool_overrides() {
    let config = DatabaseConfig::new("postgres://localhost/papa").with_pool(Some(50), None);
    assert_eq!(config.max_connections, 50);
    assert_eq!(config.min_connections, 2);

    let config = DatabaseConfig::new("postgres://localhost/papa");
    assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
}

#[test]
fn test_database_config_rejects_non_postgres_url() {
    let config = DatabaseConfig::new("mysql://localhost/papa");
    assert!(matches!(
        config.validate(),
        Err(ServiceError::Configuration { .. })
    ));
}

#[test]
fn test_database_config_rejects_inverted_pool() {
    let config = DatabaseConfig::new("postgres://localhost/papa").with_pool(Some(2), Some(5));
    assert!(config.validate().is_err());
}

#[test]
fn test_server_config_validates_address() {
    let db = DatabaseConfig::new("postgres://localhost/papa");
    assert!(ServerConfig::new("127.0.0.1:3000", db.clone()).is_ok());

    let err = ServerConfig::new("not-an-address", db).unwrap_err();
    assert!(err.to_string().contains("invalid bind address"));
}
