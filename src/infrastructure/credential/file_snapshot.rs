//! JSON file snapshot of the credential mapping

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::credential::{CredentialMap, CredentialSnapshotStore};
use crate::domain::DomainError;

/// Persists the mapping as a pretty-printed JSON object of identity to key.
///
/// Writes go through a temp file and a rename so readers see either the old
/// or the new snapshot, never a partial one.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

#[async_trait]
impl CredentialSnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Option<CredentialMap>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::store_unavailable(format!(
                    "Failed to read credential snapshot '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let credentials: CredentialMap = serde_json::from_str(&contents).map_err(|e| {
            DomainError::store_unavailable(format!(
                "Credential snapshot '{}' is corrupt: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(credentials))
    }

    async fn save(&self, credentials: &CredentialMap) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(credentials).map_err(|e| {
            DomainError::internal(format!("Failed to serialize credentials: {}", e))
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::store_unavailable(format!(
                    "Failed to create snapshot directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let tmp = self.temp_path();

        tokio::fs::write(&tmp, json.as_bytes())
            .await
            .map_err(|e| DomainError::store_unavailable(format!("Failed to write snapshot: {}", e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| DomainError::store_unavailable(format!("Failed to replace snapshot: {}", e)))?;

        debug!(path = %self.path.display(), entries = credentials.len(), "Credential snapshot saved");
        Ok(())
    }

    async fn remove(&self) -> Result<(), DomainError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Credential snapshot removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::store_unavailable(format!(
                "Failed to remove credential snapshot '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }
}
