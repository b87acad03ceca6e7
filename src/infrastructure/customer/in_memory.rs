//! In-memory customer store

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::customer::{Customer, CustomerFilter, CustomerStore, RecordHandle, StoredCustomer};
use crate::domain::DomainError;

/// Thread-safe in-memory customer store
///
/// Keeps records in insertion order. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryCustomerStore {
    customers: RwLock<Vec<StoredCustomer>>,
    available: AtomicBool,
}

impl Default for InMemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCustomerStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self {
            customers: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store pre-populated with customers
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let stored = customers
            .into_iter()
            .map(|c| StoredCustomer::new(RecordHandle::generate(), c))
            .collect();

        Self {
            customers: RwLock::new(stored),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate losing or regaining the connection
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::store_unavailable("Customer store is not reachable"))
        }
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find(&self, filter: &CustomerFilter) -> Result<Vec<StoredCustomer>, DomainError> {
        self.check_available()?;
        let customers = self.customers.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(customers
            .iter()
            .filter(|c| filter.matches(&c.customer))
            .cloned()
            .collect())
    }

    async fn insert(&self, customer: Customer) -> Result<StoredCustomer, DomainError> {
        self.check_available()?;
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let stored = StoredCustomer::new(RecordHandle::generate(), customer);
        customers.push(stored.clone());
        Ok(stored)
    }

    async fn replace(&self, customer: &Customer) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        match customers.iter_mut().find(|c| c.id() == customer.id) {
            Some(existing) => {
                existing.customer = customer.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        match customers.iter().position(|c| c.id() == id) {
            Some(index) => {
                customers.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.check_available()?;
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        customers.clear();
        Ok(())
    }

    async fn reset(&self, seed: Vec<Customer>) -> Result<Vec<StoredCustomer>, DomainError> {
        self.check_available()?;
        let mut customers = self.customers.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let stored: Vec<StoredCustomer> = seed
            .into_iter()
            .map(|c| StoredCustomer::new(RecordHandle::generate(), c))
            .collect();

        *customers = stored.clone();
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.check_available()
    }
}
