//! Customer store factory for runtime backend selection

use std::sync::Arc;

use crate::domain::customer::CustomerStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryCustomerStore;
use super::postgres::PostgresCustomerStore;

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// PostgreSQL connection settings
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Table holding customer documents
    pub table: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/customer_db".to_string(),
            max_connections: 10,
            connect_timeout_secs: 5,
            table: "customers".to_string(),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Build the customer store for a configuration
pub fn create_customer_store(config: &StorageConfig) -> Result<Arc<dyn CustomerStore>, DomainError> {
    match config {
        StorageConfig::InMemory => Ok(Arc::new(InMemoryCustomerStore::new())),
        StorageConfig::Postgres(pg) => Ok(Arc::new(PostgresCustomerStore::connect_lazy(pg)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("mongo"), None);
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/app")
            .with_max_connections(3)
            .with_connect_timeout(2)
            .with_table("clients");

        assert_eq!(config.url, "postgres://db/app");
        assert_eq!(config.max_connections, 3);
        assert_eq!(config.connect_timeout_secs, 2);
        assert_eq!(config.table, "clients");
    }

    #[tokio::test]
    async fn test_create_in_memory_store() {
        let store = create_customer_store(&StorageConfig::InMemory).unwrap();
        assert!(store.ping().await.is_ok());
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);
    }
}
