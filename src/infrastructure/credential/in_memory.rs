//! In-memory credential snapshot

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::credential::{CredentialMap, CredentialSnapshotStore};
use crate::domain::DomainError;

/// Snapshot store kept in memory.
///
/// Stands in for the file adapter in tests and can be told to fail.
#[derive(Debug, Default, Clone)]
pub struct InMemorySnapshotStore {
    snapshot: Arc<RwLock<Option<CredentialMap>>>,
    should_fail: Arc<RwLock<bool>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a persisted mapping already present
    pub fn with_snapshot(credentials: CredentialMap) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(credentials))),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    /// Set whether operations should fail
    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    /// The currently persisted mapping, if any
    pub async fn current(&self) -> Option<CredentialMap> {
        self.snapshot.read().await.clone()
    }

    async fn check_should_fail(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::store_unavailable(
                "Snapshot store configured to fail",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialSnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<CredentialMap>, DomainError> {
        self.check_should_fail().await?;
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, credentials: &CredentialMap) -> Result<(), DomainError> {
        self.check_should_fail().await?;
        *self.snapshot.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), DomainError> {
        self.check_should_fail().await?;
        *self.snapshot.write().await = None;
        Ok(())
    }
}
