//! Credential snapshot port

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::CredentialMap;
use crate::domain::DomainError;

/// Durable storage for the credential mapping.
///
/// `load` distinguishes "nothing persisted yet" (`Ok(None)`) from a
/// persisted but empty mapping (`Ok(Some(empty))`).
#[async_trait]
pub trait CredentialSnapshotStore: Send + Sync + Debug {
    /// Read the persisted mapping, if any
    async fn load(&self) -> Result<Option<CredentialMap>, DomainError>;

    /// Replace the persisted mapping
    async fn save(&self, credentials: &CredentialMap) -> Result<(), DomainError>;

    /// Remove the persisted mapping entirely. Removing an absent snapshot succeeds.
    async fn remove(&self) -> Result<(), DomainError>;
}
