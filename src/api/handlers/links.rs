//! Handler for link lookup endpoint.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the stored mapping and visit count for an alias.
///
/// # Endpoint
///
/// `GET /api/links/{alias}`
///
/// Looking a link up does not count as a visit.
///
/// # Errors
///
/// Returns 404 Not Found if no link has this alias.
pub async fn link_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let record = state.shortening_service.get_link(&alias).await?;

    Ok(Json(LinkResponse {
        short_url: state.shortening_service.short_url(&record.alias),
        alias: record.alias,
        url: record.target_url,
        visits: record.visits,
    }))
}
