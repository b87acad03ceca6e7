//! Customer backing store port

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Customer, StoredCustomer};
use super::filter::CustomerFilter;
use crate::domain::DomainError;

/// Primitive operations over the customer collection.
///
/// Implementations surface connection failures as
/// [`DomainError::StoreUnavailable`] and do not retry internally.
/// Invariants such as duplicate rejection live above this port.
#[async_trait]
pub trait CustomerStore: Send + Sync + Debug {
    /// Records matching the filter, in the store's natural order
    async fn find(&self, filter: &CustomerFilter) -> Result<Vec<StoredCustomer>, DomainError>;

    /// Insert a record, assigning a fresh handle
    async fn insert(&self, customer: Customer) -> Result<StoredCustomer, DomainError>;

    /// Replace the first record whose id matches, keeping its handle.
    /// Returns false when nothing matched.
    async fn replace(&self, customer: &Customer) -> Result<bool, DomainError>;

    /// Delete the first record with the given id. Returns false when nothing matched.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;

    /// Remove every record
    async fn clear(&self) -> Result<(), DomainError>;

    /// Replace the whole collection with the given records in one step.
    /// Readers never observe the empty intermediate state.
    async fn reset(&self, customers: Vec<Customer>) -> Result<Vec<StoredCustomer>, DomainError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), DomainError>;
}
