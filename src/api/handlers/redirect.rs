//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its target URL.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Request Flow
///
/// 1. Look the alias up in the store
/// 2. Prepend `https://` if the target has no protocol
/// 3. Queue a visit event for the background worker
/// 4. Return 307 Temporary Redirect
///
/// The visit is counted after the response is sent; a failed increment does
/// not affect the redirect.
///
/// # Errors
///
/// Returns 404 Not Found if the alias doesn't exist.
/// Returns 500 Internal Server Error if the lookup fails or times out.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target = state
        .alias_resolver
        .resolve(&alias)
        .await?
        .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))?;

    Ok(Redirect::temporary(&target))
}
