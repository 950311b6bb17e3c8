//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::validate_url;

/// Creates (or returns the existing) short token for a URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "shortToken": "aB3xY9" }
/// ```
///
/// Submitting the same URL again returns the same token.
///
/// # Errors
///
/// - `400` if `url` is missing or empty, or the body is not JSON
/// - `422` if the body is JSON of the wrong shape
/// - `422` if `url` is malformed, not HTTP(S), or too short/long
/// - `403` if the host is blocked
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let url = payload.url.unwrap_or_default();
    validate_url(&url)?;

    let mapping = state.url_service.create_short_url(&url).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_token: mapping.short_token,
        }),
    ))
}
