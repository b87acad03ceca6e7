//! Credential store service
//!
//! Owns the identity to key mapping. All mutations are serialized behind a
//! single write lock and persisted through the snapshot port before they are
//! committed to memory, so a failed save leaves the store untouched.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::credential::{
    key_prefix, validate_identity, CredentialMap, CredentialSnapshotStore,
};
use crate::domain::DomainError;

use super::generator::ApiKeyGenerator;

/// Identity mapping plus a reverse index from key to identity
#[derive(Debug, Default)]
struct CredentialIndex {
    by_identity: CredentialMap,
    by_key: HashMap<String, String>,
}

impl CredentialIndex {
    fn from_map(by_identity: CredentialMap) -> Self {
        let by_key = by_identity
            .iter()
            .map(|(identity, key)| (key.clone(), identity.clone()))
            .collect();

        Self {
            by_identity,
            by_key,
        }
    }
}

/// Credential store for issuing and validating API keys
#[derive(Debug)]
pub struct CredentialStore {
    state: RwLock<CredentialIndex>,
    snapshot: Arc<dyn CredentialSnapshotStore>,
    generator: ApiKeyGenerator,
}

impl CredentialStore {
    /// Create an empty store backed by the given snapshot port
    pub fn new(snapshot: Arc<dyn CredentialSnapshotStore>) -> Self {
        Self {
            state: RwLock::new(CredentialIndex::default()),
            snapshot,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Create a store from whatever the snapshot holds.
    ///
    /// A missing or unreadable snapshot yields an empty store.
    pub async fn load(snapshot: Arc<dyn CredentialSnapshotStore>) -> Self {
        let credentials = match snapshot.load().await {
            Ok(Some(credentials)) => {
                info!("Loaded {} API key(s) from snapshot", credentials.len());
                credentials
            }
            Ok(None) => {
                info!("No credential snapshot found, starting with no API keys");
                CredentialMap::new()
            }
            Err(e) => {
                warn!("Ignoring unreadable credential snapshot: {}", e);
                CredentialMap::new()
            }
        };

        Self {
            state: RwLock::new(CredentialIndex::from_map(credentials)),
            snapshot,
            generator: ApiKeyGenerator::new(),
        }
    }

    /// Issue a new key for an identity that has none yet.
    ///
    /// An identity that already holds a key is a conflict, including the
    /// bootstrap identity, even though it would not pass email validation.
    pub async fn issue(&self, identity: &str) -> Result<String, DomainError> {
        let mut state = self.state.write().await;

        let trimmed = identity.trim();
        if state.by_identity.contains_key(trimmed) {
            debug!(identity = %trimmed, "Rejected duplicate API key registration");
            return Err(DomainError::conflict(format!(
                "An API key is already registered for '{}'",
                trimmed
            )));
        }

        let identity = validate_identity(identity)?;

        let key = self.generator.generate();
        let mut next = state.by_identity.clone();
        next.insert(identity.clone(), key.clone());

        self.snapshot.save(&next).await?;
        *state = CredentialIndex::from_map(next);

        info!(identity = %identity, key_prefix = %key_prefix(&key), "API key issued");
        Ok(key)
    }

    /// Upsert a caller-supplied key, bypassing duplicate checks.
    ///
    /// Used once at startup to seed the bootstrap identity.
    pub async fn register_default(&self, identity: &str, key: &str) -> Result<(), DomainError> {
        let identity = identity.trim();
        let key = key.trim();

        if identity.is_empty() {
            return Err(DomainError::validation("Default identity cannot be empty"));
        }

        if key.is_empty() {
            return Err(DomainError::validation("Default API key cannot be empty"));
        }

        let mut state = self.state.write().await;
        let mut next = state.by_identity.clone();
        next.insert(identity.to_string(), key.to_string());

        self.snapshot.save(&next).await?;
        *state = CredentialIndex::from_map(next);

        info!(identity = %identity, "Default API key registered");
        Ok(())
    }

    /// True if the key belongs to some identity
    pub async fn is_valid(&self, presented_key: &str) -> bool {
        self.state.read().await.by_key.contains_key(presented_key)
    }

    /// Gate a request on a presented key.
    ///
    /// Missing key is `Unauthenticated`, an unknown key is `Forbidden`.
    pub async fn authorize(&self, presented_key: Option<&str>) -> Result<(), DomainError> {
        let presented_key = match presented_key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(DomainError::unauthenticated("API Key is missing")),
        };

        if !self.is_valid(presented_key).await {
            debug!(key_prefix = %key_prefix(presented_key), "Rejected unknown API key");
            return Err(DomainError::forbidden("API Key is invalid"));
        }

        Ok(())
    }

    /// Drop every key and delete the persisted snapshot
    pub async fn reset(&self) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        self.snapshot.remove().await?;
        let cleared = state.by_identity.len();
        *state = CredentialIndex::default();

        info!("Credential store reset, {} API key(s) removed", cleared);
        Ok(())
    }

    /// The key currently registered for an identity
    pub async fn key_for(&self, identity: &str) -> Option<String> {
        self.state.read().await.by_identity.get(identity).cloned()
    }

    /// Registered identities, sorted
    pub async fn identities(&self) -> Vec<String> {
        self.state.read().await.by_identity.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.by_identity.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::DEFAULT_IDENTITY;
    use crate::infrastructure::credential::{InMemorySnapshotStore, JsonFileSnapshotStore};

    fn store_with_snapshot() -> (CredentialStore, InMemorySnapshotStore) {
        let snapshot = InMemorySnapshotStore::new();
        let store = CredentialStore::new(Arc::new(snapshot.clone()));
        (store, snapshot)
    }

    #[tokio::test]
    async fn test_issue_returns_hex_key_that_validates() {
        let (store, _) = store_with_snapshot();

        let key = store.issue("a@x.com").await.unwrap();

        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(store.is_valid(&key).await);
        assert!(!store.is_valid("deadbeef").await);
    }

    #[tokio::test]
    async fn test_issue_twice_is_conflict_and_keeps_first_key() {
        let (store, _) = store_with_snapshot();

        let first = store.issue("a@x.com").await.unwrap();
        let err = store.issue("a@x.com").await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(store.key_for("a@x.com").await, Some(first));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_issue_for_bootstrap_identity_is_conflict() {
        let (store, _) = store_with_snapshot();
        store.register_default(DEFAULT_IDENTITY, "boot").await.unwrap();

        let err = store.issue(DEFAULT_IDENTITY).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(store.key_for(DEFAULT_IDENTITY).await.as_deref(), Some("boot"));
    }

    #[tokio::test]
    async fn test_issue_with_padded_existing_identity_is_conflict() {
        let (store, _) = store_with_snapshot();
        store.issue("a@x.com").await.unwrap();

        let err = store.issue("  a@x.com ").await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_issue_rejects_invalid_identity() {
        let (store, snapshot) = store_with_snapshot();

        let err = store.issue("nobody").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(store.is_empty().await);
        assert_eq!(snapshot.current().await, None);
    }

    #[tokio::test]
    async fn test_issue_persists_before_returning() {
        let (store, snapshot) = store_with_snapshot();

        let key = store.issue("a@x.com").await.unwrap();

        let persisted = snapshot.current().await.unwrap();
        assert_eq!(persisted.get("a@x.com"), Some(&key));
    }

    #[tokio::test]
    async fn test_failed_save_leaves_store_unchanged() {
        let (store, snapshot) = store_with_snapshot();
        snapshot.set_should_fail(true).await;

        let err = store.issue("a@x.com").await.unwrap_err();

        assert!(matches!(err, DomainError::StoreUnavailable { .. }));
        assert!(store.is_empty().await);

        snapshot.set_should_fail(false).await;
        assert!(store.issue("a@x.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_keys_invalid_after_reset() {
        let (store, snapshot) = store_with_snapshot();
        let key = store.issue("a@x.com").await.unwrap();

        store.reset().await.unwrap();

        assert!(!store.is_valid(&key).await);
        assert!(store.is_empty().await);
        assert_eq!(snapshot.current().await, None);
        assert!(store.issue("a@x.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_default_upserts() {
        let (store, _) = store_with_snapshot();

        store.register_default(DEFAULT_IDENTITY, "first").await.unwrap();
        store.register_default(DEFAULT_IDENTITY, "second").await.unwrap();

        assert!(!store.is_valid("first").await);
        assert!(store.is_valid("second").await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_default_rejects_empty_key() {
        let (store, _) = store_with_snapshot();

        let err = store.register_default(DEFAULT_IDENTITY, "  ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_authorize_precedence() {
        let (store, _) = store_with_snapshot();
        let key = store.issue("a@x.com").await.unwrap();

        assert!(matches!(
            store.authorize(None).await,
            Err(DomainError::Unauthenticated { .. })
        ));
        assert!(matches!(
            store.authorize(Some("")).await,
            Err(DomainError::Unauthenticated { .. })
        ));
        assert!(matches!(
            store.authorize(Some("deadbeef")).await,
            Err(DomainError::Forbidden { .. })
        ));
        assert!(store.authorize(Some(&key)).await.is_ok());
    }

    #[tokio::test]
    async fn test_load_restores_persisted_keys() {
        let mut credentials = CredentialMap::new();
        credentials.insert("a@x.com".to_string(), "k1".to_string());
        let snapshot = InMemorySnapshotStore::with_snapshot(credentials);

        let store = CredentialStore::load(Arc::new(snapshot)).await;

        assert!(store.is_valid("k1").await);
        assert_eq!(store.identities().await, vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_load_failure_starts_empty() {
        let snapshot = InMemorySnapshotStore::new();
        snapshot.set_should_fail(true).await;

        let store = CredentialStore::load(Arc::new(snapshot)).await;

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_reset_then_restart_yields_empty_store_and_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_keys.json");

        let store = CredentialStore::load(Arc::new(JsonFileSnapshotStore::new(&path))).await;
        store.issue("a@x.com").await.unwrap();
        assert!(path.exists());

        store.reset().await.unwrap();
        assert!(!path.exists());

        let restarted = CredentialStore::load(Arc::new(JsonFileSnapshotStore::new(&path))).await;
        assert!(restarted.is_empty().await);
    }

    #[tokio::test]
    async fn test_keys_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_keys.json");

        let store = CredentialStore::load(Arc::new(JsonFileSnapshotStore::new(&path))).await;
        let key = store.issue("a@x.com").await.unwrap();

        let restarted = CredentialStore::load(Arc::new(JsonFileSnapshotStore::new(&path))).await;
        assert!(restarted.is_valid(&key).await);
    }

    #[tokio::test]
    async fn test_concurrent_issue_for_same_identity_has_one_winner() {
        let (store, _) = store_with_snapshot();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.issue("race@x.com").await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;

        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(DomainError::Conflict { .. }) => conflicts += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.len().await, 1);
    }
}
