//! Request and response types shared by the handlers

mod error;
mod json;

pub use error::{ApiError, ErrorBody, ErrorKind};
pub use json::{Json, JsonRejection, OptionalJson};

use serde::{Deserialize, Serialize};

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
