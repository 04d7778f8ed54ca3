//! HTTP API module for root, health, status, metrics and docs endpoints.

pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use docs::{openapi_json, ApiDoc};
pub use handlers::AppState;
pub use routes::create_router;
