//! Identity validation

use thiserror::Error;
use validator::ValidateEmail;

use crate::domain::DomainError;

/// Errors that can occur while validating an identity
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IdentityValidationError {
    #[error("Email is required")]
    Empty,

    #[error("Email exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

impl From<IdentityValidationError> for DomainError {
    fn from(err: IdentityValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

const MAX_IDENTITY_LENGTH: usize = 254;

/// Validate an identity and return its normalized (trimmed) form
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 254 characters
/// - Must be a syntactically valid email address
pub fn validate_identity(identity: &str) -> Result<String, IdentityValidationError> {
    let trimmed = identity.trim();

    if trimmed.is_empty() {
        return Err(IdentityValidationError::Empty);
    }

    if trimmed.len() > MAX_IDENTITY_LENGTH {
        return Err(IdentityValidationError::TooLong(MAX_IDENTITY_LENGTH));
    }

    if !trimmed.validate_email() {
        return Err(IdentityValidationError::InvalidEmail(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}
