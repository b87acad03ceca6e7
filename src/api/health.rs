//! Liveness and readiness probes
//!
//! `/health` and `/live` only prove the process answers. `/ready` also
//! pings the customer store and counts the registered identities.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

/// Body returned by the probes
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub status: ProbeStatus,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentReport>,
}

/// State of one dependency as seen by `/ready`
#[derive(Debug, Serialize)]
pub struct ComponentReport {
    pub name: &'static str,
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub elapsed_ms: u64,
}

impl ProbeReport {
    fn new(components: Vec<ComponentReport>) -> Self {
        let status = if components.iter().all(|c| c.status == ProbeStatus::Up) {
            ProbeStatus::Up
        } else {
            ProbeStatus::Down
        };

        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            components,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            ProbeStatus::Up => StatusCode::OK,
            ProbeStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(ProbeReport::new(Vec::new())))
}

/// GET /ready
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let report = ProbeReport::new(vec![
        check_customer_store(&state).await,
        check_credentials(&state).await,
    ]);

    (report.status_code(), Json(report))
}

/// GET /live
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_customer_store(state: &AppState) -> ComponentReport {
    let start = Instant::now();
    let result = state.customers.ping().await;

    ComponentReport {
        name: "customer_store",
        status: if result.is_ok() {
            ProbeStatus::Up
        } else {
            ProbeStatus::Down
        },
        detail: result.err().map(|e| e.to_string()),
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}

// An empty credential store is still ready: keys may have just been reset.
async fn check_credentials(state: &AppState) -> ComponentReport {
    let start = Instant::now();
    let identities = state.credentials.identities().await;

    ComponentReport {
        name: "credentials",
        status: ProbeStatus::Up,
        detail: Some(format!("{} identities registered", identities.len())),
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}
