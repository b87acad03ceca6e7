//! Customer endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::middleware::{RequireApiKey, API_KEY_QUERY_PARAM};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, MessageResponse, OptionalJson};
use crate::domain::customer::{CustomerPayload, StoredCustomer};

/// GET /customers
pub async fn list(
    _auth: RequireApiKey,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredCustomer>>, ApiError> {
    Ok(Json(state.customers.list(None).await?))
}

/// GET /customers/find?<field>=<value>
pub async fn find(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<StoredCustomer>>, ApiError> {
    let query: Vec<(String, String)> = query
        .into_iter()
        .filter(|(name, _)| name != API_KEY_QUERY_PARAM)
        .collect();

    Ok(Json(state.customers.find_by_single_field(&query).await?))
}

/// GET /customers/{id}
pub async fn get(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredCustomer>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.customers.find_by_id(id).await?))
}

/// POST /customers
pub async fn create(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    OptionalJson(body): OptionalJson,
) -> Result<(StatusCode, Json<StoredCustomer>), ApiError> {
    let stored = state.customers.insert(payload(body)).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /customers/{id}
pub async fn update(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalJson(body): OptionalJson,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let message = state.customers.update(payload(body).with_id(id)).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// DELETE /customers/{id}
pub async fn delete(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let message = state.customers.delete_by_id(id).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// GET /reset
pub async fn reset(
    _auth: RequireApiKey,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.customers.reset_to_seed().await?;
    Ok(Json(MessageResponse::new(message)))
}

fn payload(body: Option<serde_json::Value>) -> CustomerPayload {
    body.map(CustomerPayload::new).unwrap_or_else(CustomerPayload::absent)
}

/// Non-numeric ids can never match a record
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::not_found("Customer not found"))
}
