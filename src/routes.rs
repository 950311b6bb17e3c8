//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`       - Create or reuse a short token
//! - `GET  /stats/{token}` - Click statistics
//! - `GET  /get-token`     - Token lookup by original URL
//! - `GET  /health`        - Health check
//! - `GET  /{token}`       - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    get_token_handler, health_handler, not_found_handler, redirect_handler,
    shorten_handler, shorten_method_not_allowed, stats_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes and handlers without path normalization.
///
/// Used directly by integration tests; [`app_router`] wraps it for serving.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/shorten",
            post(shorten_handler).fallback(shorten_method_not_allowed),
        )
        .route("/stats/{token}", get(stats_handler))
        .route("/get-token", get(get_token_handler))
        .route("/health", get(health_handler))
        .route("/{token}", get(redirect_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state))
}
