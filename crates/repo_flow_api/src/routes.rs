//! HTTP routing configuration
//!
//! - POST   /api/github - Repository structure with call sites
//! - POST   /api/graph  - Flow graph and unmatched calls
//! - GET    /api/health - Health check

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{handlers, middleware as api_middleware, AppState};

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

/// Limit for a whole analysis, which makes one GitHub call per directory
/// and entry point.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Create the complete API router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS for web UI support
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(false)
        // Cache preflight responses for 1 hour
        .max_age(Duration::from_secs(3600));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().include_headers(true))
        .on_response(DefaultOnResponse::new().include_headers(true));

    let timeout_layer = TimeoutLayer::new(REQUEST_TIMEOUT);

    let api = Router::new()
        .route("/github", post(handlers::fetch_structure))
        .route("/graph", post(handlers::build_flow_graph))
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(api_middleware::tracing_middleware))
        .layer(timeout_layer)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state);

    Router::new().nest("/api", api)
}
