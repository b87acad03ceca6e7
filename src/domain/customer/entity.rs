//! Customer entity types

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer record as supplied by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Caller-supplied primary key
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Customer {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Repository-owned record handle, never settable by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordHandle(Uuid);

impl RecordHandle {
    /// Generate a fresh handle
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer as held by the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCustomer {
    #[serde(rename = "_id")]
    pub handle: RecordHandle,
    #[serde(flatten)]
    pub customer: Customer,
}

impl StoredCustomer {
    pub fn new(handle: RecordHandle, customer: Customer) -> Self {
        Self { handle, customer }
    }

    pub fn id(&self) -> i64 {
        self.customer.id
    }
}
