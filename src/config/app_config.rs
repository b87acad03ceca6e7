use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::credential::DEFAULT_IDENTITY;
use crate::domain::DomainError;
use crate::infrastructure::customer::{PostgresConfig, StorageConfig, StorageType};

/// Environment variable consulted when no default key is configured
pub const API_KEY_ENV: &str = "API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub credentials: CredentialsConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for requests no route matches
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// JSON snapshot of issued keys
    pub snapshot_path: PathBuf,
    /// Identity the bootstrap key is registered under
    pub default_identity: String,
    /// Bootstrap key; falls back to the `API_KEY` environment variable
    pub default_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub table: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            static_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("api_keys.json"),
            default_identity: DEFAULT_IDENTITY.to_string(),
            default_key: None,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        let pg = PostgresConfig::default();
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: pg.max_connections,
            connect_timeout_secs: pg.connect_timeout_secs,
            table: pg.table,
        }
    }
}

impl CredentialsConfig {
    /// The bootstrap key from configuration or the environment
    pub fn resolve_default_key(&self) -> Result<String, DomainError> {
        self.default_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "No default API key configured. Set credentials.default_key or {}",
                    API_KEY_ENV
                ))
            })
    }
}

impl StorageSettings {
    /// Translate into a backend configuration
    pub fn to_storage_config(&self) -> Result<StorageConfig, DomainError> {
        let storage_type = StorageType::from_str(&self.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown storage backend '{}'", self.backend))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(StorageConfig::InMemory),
            StorageType::Postgres => {
                let url = self
                    .database_url
                    .clone()
                    .or_else(|| std::env::var("DATABASE_URL").ok())
                    .ok_or_else(|| {
                        DomainError::configuration(
                            "storage.database_url or DATABASE_URL is required for postgres",
                        )
                    })?;

                Ok(StorageConfig::Postgres(
                    PostgresConfig::new(url)
                        .with_max_connections(self.max_connections)
                        .with_connect_timeout(self.connect_timeout_secs)
                        .with_table(self.table.clone()),
                ))
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.credentials.default_identity, "default");
        assert_eq!(config.credentials.snapshot_path, PathBuf::from("api_keys.json"));
        assert_eq!(config.storage.backend, "memory");
    }

    #[test]
    fn test_configured_default_key_wins() {
        let credentials = CredentialsConfig {
            default_key: Some("  bootstrap  ".to_string()),
            ..CredentialsConfig::default()
        };

        assert_eq!(credentials.resolve_default_key().unwrap(), "bootstrap");
    }

    #[test]
    fn test_blank_default_key_is_rejected_without_env_fallback() {
        let credentials = CredentialsConfig {
            default_key: Some("   ".to_string()),
            ..CredentialsConfig::default()
        };

        assert!(matches!(
            credentials.resolve_default_key(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_memory_storage_config() {
        let settings = StorageSettings::default();
        assert!(matches!(
            settings.to_storage_config().unwrap(),
            StorageConfig::InMemory
        ));
    }

    #[test]
    fn test_postgres_storage_config() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://db/customers".to_string()),
            table: "clients".to_string(),
            ..StorageSettings::default()
        };

        match settings.to_storage_config().unwrap() {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://db/customers");
                assert_eq!(pg.table, "clients");
            }
            other => panic!("expected postgres config, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let settings = StorageSettings {
            backend: "mongo".to_string(),
            ..StorageSettings::default()
        };

        assert!(settings.to_storage_config().is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 9000 },
            "logging": { "format": "json" }
        }))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(matches!(config.logging.format, LogFormat::Json));
    }
}
