//! API layer - HTTP endpoints and middleware

pub mod api_keys;
pub mod customers;
pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub use middleware::RequireApiKey;
pub use router::{create_router, create_router_with_static};
pub use state::AppState;
