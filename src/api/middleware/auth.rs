//! API key gate

use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderMap, Uri},
};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::DomainError;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter consulted when no header is present
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Extractor that requires a valid API key
///
/// Looks for the key in, in order:
/// - `X-API-Key: <api_key>`
/// - `Authorization: Bearer <api_key>`
/// - `?api_key=<api_key>`
///
/// A missing key is rejected with 401. An unknown key, or a header value
/// that is not valid UTF-8, is rejected with 403.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    api_key: Option<String>,
}

/// The key a request carried, if any
#[derive(Debug, PartialEq, Eq)]
enum PresentedKey {
    Missing,
    Key(String),
    /// Present but not valid UTF-8, so it can never match an issued key
    Undecodable,
}

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match extract_api_key(&parts.headers, &parts.uri)? {
            PresentedKey::Key(key) => state.credentials.authorize(Some(key.as_str())).await?,
            PresentedKey::Missing => state.credentials.authorize(None).await?,
            PresentedKey::Undecodable => {
                debug!("Rejected API key header with invalid encoding");
                return Err(DomainError::forbidden("API Key is invalid").into());
            }
        }

        debug!("API key accepted");
        Ok(RequireApiKey)
    }
}

fn extract_api_key(headers: &HeaderMap, uri: &Uri) -> Result<PresentedKey, ApiError> {
    match extract_api_key_from_headers(headers) {
        PresentedKey::Missing => {}
        presented => return Ok(presented),
    }

    let query = Query::<ApiKeyQuery>::try_from_uri(uri)
        .map_err(|_| ApiError::bad_request("Invalid query string"))?;

    Ok(query
        .0
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .map_or(PresentedKey::Missing, PresentedKey::Key))
}

fn extract_api_key_from_headers(headers: &HeaderMap) -> PresentedKey {
    if let Some(api_key_header) = headers.get(API_KEY_HEADER) {
        let Ok(key) = api_key_header.to_str() else {
            return PresentedKey::Undecodable;
        };

        let key = key.trim();
        if !key.is_empty() {
            return PresentedKey::Key(key.to_string());
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let Ok(auth_str) = auth_header.to_str() else {
            return PresentedKey::Undecodable;
        };

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            let token = token.trim();

            if !token.is_empty() {
                return PresentedKey::Key(token.to_string());
            }
        }
    }

    PresentedKey::Missing
}
