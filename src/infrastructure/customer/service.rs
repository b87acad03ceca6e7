//! Customer repository
//!
//! Enforces record invariants on top of a [`CustomerStore`]. Reads share a
//! repository-wide lock and every mutation takes it exclusively, so duplicate
//! checks cannot race and readers never see the empty state in the middle of
//! a reset.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::customer::{
    seed_customers, single_field_filter, CustomerFilter, CustomerPayload, CustomerStore,
    StoredCustomer,
};
use crate::domain::DomainError;

pub const CUSTOMER_UPDATED: &str = "Customer updated";
pub const CUSTOMER_DELETED: &str = "Customer deleted";
pub const CUSTOMERS_RESET: &str = "Customers reset";

/// Invariant-enforcing repository over the customer collection
#[derive(Debug)]
pub struct CustomerRepository {
    store: Arc<dyn CustomerStore>,
    guard: RwLock<()>,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self {
            store,
            guard: RwLock::new(()),
        }
    }

    /// All records matching the filter, or every record without one
    pub async fn list(
        &self,
        filter: Option<&CustomerFilter>,
    ) -> Result<Vec<StoredCustomer>, DomainError> {
        let _read = self.guard.read().await;
        let all = CustomerFilter::all();
        self.store.find(filter.unwrap_or(&all)).await
    }

    /// The first record with the given id
    pub async fn find_by_id(&self, id: i64) -> Result<StoredCustomer, DomainError> {
        self.list(Some(&CustomerFilter::by_id(id)))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found("Customer not found"))
    }

    /// Search on exactly one allow-listed field.
    ///
    /// Zero matches is `NotFound`; a malformed query is `Validation`.
    pub async fn find_by_single_field(
        &self,
        query: &[(String, String)],
    ) -> Result<Vec<StoredCustomer>, DomainError> {
        let filter = single_field_filter(query)?;
        let customers = self.list(Some(&filter)).await?;

        if customers.is_empty() {
            return Err(DomainError::not_found("No customers matched the query"));
        }

        Ok(customers)
    }

    /// Insert a record whose id and email are both unused
    pub async fn insert(&self, payload: CustomerPayload) -> Result<StoredCustomer, DomainError> {
        let customer = payload.into_customer()?;
        let _write = self.guard.write().await;

        let id_taken = !self.store.find(&CustomerFilter::by_id(customer.id)).await?.is_empty();
        let email_taken = !self
            .store
            .find(&CustomerFilter::by_email(&customer.email))
            .await?
            .is_empty();

        if id_taken || email_taken {
            debug!(id = customer.id, email = %customer.email, "Rejected duplicate customer");
            return Err(DomainError::conflict(
                "Customer with the same id or email already exists",
            ));
        }

        let stored = self.store.insert(customer).await?;
        info!(id = stored.id(), handle = %stored.handle, "Customer inserted");
        Ok(stored)
    }

    /// Replace the record with the payload's id; never inserts
    pub async fn update(&self, payload: CustomerPayload) -> Result<&'static str, DomainError> {
        let customer = payload.into_customer()?;
        let _write = self.guard.write().await;

        if !self.store.replace(&customer).await? {
            return Err(DomainError::not_found("Customer not found"));
        }

        info!(id = customer.id, "Customer updated");
        Ok(CUSTOMER_UPDATED)
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<&'static str, DomainError> {
        let _write = self.guard.write().await;

        if !self.store.delete(id).await? {
            return Err(DomainError::not_found("Customer not found"));
        }

        info!(id, "Customer deleted");
        Ok(CUSTOMER_DELETED)
    }

    /// Replace the whole collection with the seed set
    pub async fn reset_to_seed(&self) -> Result<&'static str, DomainError> {
        let _write = self.guard.write().await;

        let seeded = self.store.reset(seed_customers()).await?;

        info!("Customers reset to {} seed record(s)", seeded.len());
        Ok(CUSTOMERS_RESET)
    }

    /// Check the backing store is reachable
    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }
}
