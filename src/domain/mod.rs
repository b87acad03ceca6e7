//! Domain layer - Core entities, ports and validation

pub mod credential;
pub mod customer;
pub mod error;

pub use credential::{CredentialMap, CredentialSnapshotStore};
pub use customer::{Customer, CustomerFilter, CustomerPayload, CustomerStore, StoredCustomer};
pub use error::DomainError;
