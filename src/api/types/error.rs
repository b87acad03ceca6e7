//! Error responses
//!
//! Every failure leaves the service as
//! `{"error": {"message": .., "type": .., "param": .., "code": ..}}`,
//! with `param` and `code` omitted when unset.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::DomainError;

/// Category reported in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    Authentication,
    Permission,
    NotFound,
    Conflict,
    Server,
    Unavailable,
}

impl ErrorKind {
    /// Status a response of this kind carries unless overridden
    pub fn status(self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Permission => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Server => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: &'a ErrorBody,
}

/// Handler error rendered as the JSON envelope
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: kind.status(),
            body: ErrorBody {
                message: message.into(),
                kind,
                param: None,
                code: None,
            },
        }
    }

    /// Name the request field at fault
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.body.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.body.code = Some(code.into());
        self
    }

    /// Keep the kind but answer with a different status
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(Envelope { error: &self.body })).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Unauthenticated { message } => Self::new(ErrorKind::Authentication, message),
            DomainError::Forbidden { message } => Self::new(ErrorKind::Permission, message),
            DomainError::Conflict { message } => {
                Self::new(ErrorKind::Conflict, message).with_code("duplicate")
            }
            DomainError::Validation { message } => Self::new(ErrorKind::InvalidRequest, message),
            DomainError::NotFound { message } => Self::new(ErrorKind::NotFound, message),
            DomainError::StoreUnavailable { message } => Self::new(ErrorKind::Unavailable, message),
            DomainError::Configuration { message } | DomainError::Internal { message } => {
                Self::new(ErrorKind::Server, message)
            }
        }
    }
}
