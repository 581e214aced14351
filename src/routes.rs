//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{alias}`     - Short link redirect
//! - `GET  /health`      - Health check: store, visit queue
//! - `POST /createShortenedUrl` - Form-encoded link creation
//! - `/api/*`            - JSON API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, shorten_form_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{alias}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/createShortenedUrl", post(shorten_form_handler))
        .nest("/api", api::routes::api_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
