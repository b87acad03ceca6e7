//! Customer Gate
//!
//! A customer record API where every record operation requires an API key
//! issued to a registered identity. Keys survive restarts through a JSON
//! snapshot on disk.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::credential::{CredentialStore, JsonFileSnapshotStore};
use infrastructure::customer::{create_customer_store, CustomerRepository, StorageConfig};
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    // Without a bootstrap key nobody could ever call a gated endpoint
    let default_key = config.credentials.resolve_default_key()?;

    let snapshot = Arc::new(JsonFileSnapshotStore::new(&config.credentials.snapshot_path));
    let credentials = CredentialStore::load(snapshot).await;
    credentials
        .register_default(&config.credentials.default_identity, &default_key)
        .await?;

    info!(
        identities = credentials.len().await,
        snapshot = %config.credentials.snapshot_path.display(),
        "Credential store ready"
    );

    let storage_config = config.storage.to_storage_config()?;
    info!("Storage backend: {:?}", storage_config.storage_type());

    let store = create_customer_store(&storage_config)?;
    let customers = CustomerRepository::new(store);

    if matches!(storage_config, StorageConfig::InMemory) {
        customers.reset_to_seed().await?;
        info!("Seeded in-memory customer store");
    }

    Ok(AppState::new(Arc::new(credentials), Arc::new(customers)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &tempfile::TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.credentials.snapshot_path = dir.path().join("api_keys.json");
        config.credentials.default_key = Some("bootstrap".to_string());
        config
    }

    #[tokio::test]
    async fn test_state_registers_default_key() {
        let dir = tempfile::tempdir().unwrap();
        let state = create_app_state_with_config(&test_config(&dir)).await.unwrap();

        assert!(state.credentials.is_valid("bootstrap").await);
        assert_eq!(
            state.credentials.key_for("default").await.as_deref(),
            Some("bootstrap")
        );
        assert!(dir.path().join("api_keys.json").exists());
    }

    #[tokio::test]
    async fn test_memory_backend_is_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let state = create_app_state_with_config(&test_config(&dir)).await.unwrap();

        assert_eq!(state.customers.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_issued_keys_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);

        let key = {
            let state = create_app_state_with_config(&config).await.unwrap();
            state.credentials.issue("a@x.com").await.unwrap()
        };

        let state = create_app_state_with_config(&config).await.unwrap();
        assert!(state.credentials.is_valid(&key).await);
        assert!(state.credentials.is_valid("bootstrap").await);
    }

    #[tokio::test]
    async fn test_unknown_backend_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(&dir);
        config.storage.backend = "mongo".to_string();

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
