use std::path::Path;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::api_keys;
use super::customers;
use super::health;
use super::state::AppState;

fn routes() -> Router<AppState> {
    Router::new()
        // Health endpoints (no key required)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Key issuance is open, reset requires a key
        .route(
            "/apikey",
            get(api_keys::issue_from_query)
                .post(api_keys::issue)
                .delete(api_keys::reset),
        )
        // Customer records
        .route("/customers", get(customers::list).post(customers::create))
        .route("/customers/find", get(customers::find))
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route("/reset", get(customers::reset))
}

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Create the router, serving files from `static_dir` for unmatched paths
pub fn create_router_with_static(state: AppState, static_dir: &Path) -> Router {
    routes()
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
