//! Handler for link shortening endpoint.

use axum::{Form, Json, extract::State};

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Maps a caller-chosen alias to a target URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/page",
///   "alias": "my-link"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "alias": "my-link",
///   "short_url": "https://linkify.fly.dev/my-link"
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the submission fails validation (`details.reason`
///   names the rule)
/// - 409 Conflict if the alias is already taken
/// - 500 Internal Server Error if the store fails
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    let shortened = state
        .shortening_service
        .create_short_link(&payload.url, &payload.alias)
        .await?;

    Ok(Json(shortened.into()))
}

/// Form-encoded variant of [`shorten_handler`].
///
/// # Endpoint
///
/// `POST /createShortenedUrl`
///
/// Accepts `application/x-www-form-urlencoded` bodies with the fields
/// `urlToDirect` and `shortenedUrlAlias` (or `url` and `alias`). Responses
/// and errors are the same as for [`shorten_handler`].
pub async fn shorten_form_handler(
    State(state): State<AppState>,
    Form(payload): Form<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    let shortened = state
        .shortening_service
        .create_short_link(&payload.url, &payload.alias)
        .await?;

    Ok(Json(shortened.into()))
}
