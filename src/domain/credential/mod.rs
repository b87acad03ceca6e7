//! Credential domain
//!
//! Identity to API key mapping, the snapshot port it persists through,
//! and identity validation rules.

mod entity;
mod repository;
mod validation;

pub use entity::{key_prefix, CredentialMap, DEFAULT_IDENTITY};
pub use repository::CredentialSnapshotStore;
pub use validation::{validate_identity, IdentityValidationError};
