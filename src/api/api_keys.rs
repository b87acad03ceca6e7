//! API key issuance endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireApiKey;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse};

/// Registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueApiKeyRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Freshly issued key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedApiKeyResponse {
    pub email: String,
    pub api_key: String,
}

/// POST /apikey
pub async fn issue(
    State(state): State<AppState>,
    Json(request): Json<IssueApiKeyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    issue_for(&state, request).await
}

/// GET /apikey?email=
pub async fn issue_from_query(
    State(state): State<AppState>,
    Query(request): Query<IssueApiKeyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    issue_for(&state, request).await
}

async fn issue_for(
    state: &AppState,
    request: IssueApiKeyRequest,
) -> Result<(StatusCode, Json<IssuedApiKeyResponse>), ApiError> {
    let email = request
        .email
        .ok_or_else(|| ApiError::bad_request("Email is required").with_param("email"))?;

    let api_key = state.credentials.issue(&email).await?;

    Ok((
        StatusCode::CREATED,
        Json(IssuedApiKeyResponse {
            email: email.trim().to_string(),
            api_key,
        }),
    ))
}

/// DELETE /apikey
pub async fn reset(
    _auth: RequireApiKey,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.credentials.reset().await?;
    Ok(Json(MessageResponse::new("API keys reset")))
}
