//! Caller-supplied customer documents

use serde_json::{Map, Value};

use super::entity::Customer;
use crate::domain::DomainError;

const HANDLE_FIELD: &str = "_id";

/// A parsed request body on its way to becoming a [`Customer`].
///
/// The dispatch layer hands bodies over untouched; emptiness checks and
/// handle stripping happen in [`CustomerPayload::into_customer`] so every
/// entry point gets the same treatment.
#[derive(Debug, Clone, Default)]
pub struct CustomerPayload {
    body: Option<Value>,
    id_override: Option<i64>,
}

impl CustomerPayload {
    pub fn new(body: Value) -> Self {
        Self {
            body: Some(body),
            id_override: None,
        }
    }

    /// A request that carried no body at all
    pub fn absent() -> Self {
        Self::default()
    }

    /// Force the record id, e.g. from a path segment
    pub fn with_id(mut self, id: i64) -> Self {
        self.id_override = Some(id);
        self
    }

    /// Validate and convert into a customer record
    pub fn into_customer(self) -> Result<Customer, DomainError> {
        let mut fields: Map<String, Value> = match self.body {
            None | Some(Value::Null) => return Err(missing_body()),
            Some(Value::Object(fields)) => fields,
            Some(_) => {
                return Err(DomainError::validation(
                    "request body must be a JSON object",
                ));
            }
        };

        fields.remove(HANDLE_FIELD);

        if fields.is_empty() {
            return Err(missing_body());
        }

        if let Some(id) = self.id_override {
            fields.insert("id".to_string(), Value::from(id));
        }

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| DomainError::validation(format!("Invalid customer record: {}", e)))
    }
}

fn missing_body() -> DomainError {
    DomainError::validation("missing request body")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_payload() {
        let payload = CustomerPayload::new(json!({
            "id": 5, "name": "Xavier", "email": "x@y.com", "password": "pw"
        }));

        let customer = payload.into_customer().unwrap();
        assert_eq!(customer, Customer::new(5, "Xavier", "x@y.com", "pw"));
    }

    #[test]
    fn test_absent_and_empty_payloads_are_rejected() {
        for payload in [
            CustomerPayload::absent(),
            CustomerPayload::new(Value::Null),
            CustomerPayload::new(json!({})),
            CustomerPayload::new(json!({ "_id": "abc" })),
        ] {
            let err = payload.into_customer().unwrap_err();
            assert_eq!(err.to_string(), "Validation error: missing request body");
        }
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = CustomerPayload::new(json!([1, 2])).into_customer().unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_handle_is_stripped() {
        let payload = CustomerPayload::new(json!({
            "_id": "caller-chosen",
            "id": 1, "name": "Bob", "email": "bob@abc.com", "password": "banana"
        }));

        assert_eq!(payload.into_customer().unwrap().id, 1);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let err = CustomerPayload::new(json!({ "id": 1 }))
            .into_customer()
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_id_override() {
        let payload = CustomerPayload::new(json!({
            "id": 1, "name": "Bob", "email": "bob@abc.com", "password": "banana"
        }))
        .with_id(7);

        assert_eq!(payload.into_customer().unwrap().id, 7);
    }

    #[test]
    fn test_id_override_does_not_fill_empty_body() {
        let err = CustomerPayload::new(json!({})).with_id(7).into_customer().unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
