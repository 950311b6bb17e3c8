//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::domain::entities::UrlStats;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::token_generator::is_well_formed_token;

/// Returns the original URL and click count of a token.
///
/// # Endpoint
///
/// `GET /stats/{token}`
///
/// # Response
///
/// ```json
/// { "originalUrl": "https://example.com", "shortToken": "aB3xY9", "clicks": 3 }
/// ```
///
/// Reading statistics does not count as a click.
///
/// # Errors
///
/// Returns 404 Not Found if the token doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<UrlStats>, AppError> {
    if !is_well_formed_token(&token) {
        return Err(super::token_not_found(&token));
    }

    let stats = state.url_service.get_stats(&token).await?;

    Ok(Json(stats))
}
