//! Exact-match customer filters

use std::fmt;

use super::entity::Customer;
use crate::domain::DomainError;

/// Exact-match predicate over zero or more customer fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl CustomerFilter {
    /// Matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none() && self.email.is_none() && self.password.is_none()
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        self.id.is_none_or(|id| customer.id == id)
            && self.name.as_deref().is_none_or(|name| customer.name == name)
            && self.email.as_deref().is_none_or(|email| customer.email == email)
            && self
                .password
                .as_deref()
                .is_none_or(|password| customer.password == password)
    }
}

/// Fields a single-field search may filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Id,
    Email,
    Password,
}

impl FilterField {
    pub const ALLOWED: [FilterField; 3] = [Self::Id, Self::Email, Self::Password];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "email" => Some(Self::Email),
            "password" => Some(Self::Password),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn filter_for(self, value: &str) -> Result<CustomerFilter, DomainError> {
        let filter = match self {
            Self::Id => {
                let id = value.trim().parse::<i64>().map_err(|_| {
                    DomainError::validation(format!("id must be an integer, got '{}'", value))
                })?;
                CustomerFilter::by_id(id)
            }
            Self::Email => CustomerFilter::by_email(value),
            Self::Password => CustomerFilter {
                password: Some(value.to_string()),
                ..CustomerFilter::default()
            },
        };

        Ok(filter)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a filter from raw query pairs, requiring exactly one allow-listed field
pub fn single_field_filter(query: &[(String, String)]) -> Result<CustomerFilter, DomainError> {
    let (name, value) = match query {
        [single] => single,
        [] => {
            return Err(DomainError::validation(
                "Exactly one query field is required, none given",
            ));
        }
        _ => {
            return Err(DomainError::validation(format!(
                "Exactly one query field is allowed, {} given",
                query.len()
            )));
        }
    };

    let field = FilterField::parse(name).ok_or_else(|| {
        let allowed: Vec<&str> = FilterField::ALLOWED.iter().map(FilterField::as_str).collect();
        DomainError::validation(format!(
            "Field '{}' cannot be searched, allowed fields: {}",
            name,
            allowed.join(", ")
        ))
    })?;

    field.filter_for(value)
}
