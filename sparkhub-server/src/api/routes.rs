//! REST API routes for the SparkHub server.

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_user, get_user, get_user_by_address, pay_callback, pay_request, ping, update_user,
    AppState,
};

/// Permissive CORS: any origin, the usual methods, JSON and auth headers.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the REST API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/ping", get(ping))
        // LNURL-pay
        .route("/.well-known/lnurlp/{username}", get(pay_request))
        .route(
            "/api/lightning-address/{username}/callback",
            get(pay_callback),
        )
        // User registry
        .route("/api/users", post(create_user))
        .route("/api/users/{username}", get(get_user).put(update_user))
        .route("/api/users/by-address/{address}", get(get_user_by_address))
        .route(
            "/api/users/by-spark-address/{address}",
            get(get_user_by_address),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
