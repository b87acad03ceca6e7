//! Credential infrastructure
//!
//! Key generation, snapshot adapters and the credential store service.

mod file_snapshot;
mod generator;
mod in_memory;
mod service;

pub use file_snapshot::JsonFileSnapshotStore;
pub use generator::ApiKeyGenerator;
pub use in_memory::InMemorySnapshotStore;
pub use service::CredentialStore;
