//! JSON extractors that report failures in the API error format

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// Wrapper around `axum::Json` whose rejections use the API error envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// A body that may be absent.
///
/// An empty body yields `None` instead of a rejection, leaving the
/// "missing body" decision to the domain.
#[derive(Debug, Clone, Default)]
pub struct OptionalJson(pub Option<Value>);

/// JSON rejection error that returns API error format
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        ApiError::bad_request(self.message)
            .with_status(self.status)
            .with_code("json_parse_error")
            .into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(JsonRejection {
                status: rejection.status(),
                message: format_rejection_message(&rejection),
            }),
        }
    }
}

impl<S> FromRequest<S> for OptionalJson
where
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| JsonRejection {
            status: StatusCode::BAD_REQUEST,
            message: format!("Failed to read request body: {}", e.body_text()),
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(None));
        }

        serde_json::from_slice(&bytes)
            .map(|value| OptionalJson(Some(value)))
            .map_err(|e| JsonRejection {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid JSON syntax: {}", e),
            })
    }
}

fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
