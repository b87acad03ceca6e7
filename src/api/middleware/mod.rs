//! API middleware components

pub mod auth;

pub use auth::{RequireApiKey, API_KEY_HEADER, API_KEY_QUERY_PARAM};
