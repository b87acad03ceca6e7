//! Customer domain
//!
//! Customer records, the payload wrapper the dispatch layer hands in,
//! exact-match filters and the backing store port.

mod entity;
mod filter;
mod payload;
mod repository;
mod seed;

pub use entity::{Customer, RecordHandle, StoredCustomer};
pub use filter::{single_field_filter, CustomerFilter, FilterField};
pub use payload::CustomerPayload;
pub use repository::CustomerStore;
pub use seed::seed_customers;
