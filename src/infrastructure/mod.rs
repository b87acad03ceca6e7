//! Infrastructure layer - Adapters and services behind the domain ports

pub mod credential;
pub mod customer;
pub mod logging;
