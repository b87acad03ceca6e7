//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::credential::CredentialStore;
use crate::infrastructure::customer::CustomerRepository;

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialStore>,
    pub customers: Arc<CustomerRepository>,
}

impl AppState {
    pub fn new(credentials: Arc<CredentialStore>, customers: Arc<CustomerRepository>) -> Self {
        Self {
            credentials,
            customers,
        }
    }
}
