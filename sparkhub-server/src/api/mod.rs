//! HTTP API: LNURL-pay endpoints and the user registry.

pub mod handlers;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
