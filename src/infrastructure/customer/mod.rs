//! Customer infrastructure
//!
//! Backing store adapters, runtime backend selection and the
//! invariant-enforcing customer repository.

mod factory;
mod in_memory;
mod postgres;
mod service;

pub use factory::{create_customer_store, PostgresConfig, StorageConfig, StorageType};
pub use in_memory::InMemoryCustomerStore;
pub use postgres::PostgresCustomerStore;
pub use service::CustomerRepository;
