//! API route configuration.

use crate::api::handlers::{link_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`        - Map an alias to a target URL
/// - `GET  /links/{alias}`  - Stored mapping and visit count
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/links/{alias}", get(link_handler))
}
