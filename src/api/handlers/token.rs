//! Handler for token lookup by original URL.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use validator::Validate;

use crate::api::dto::token::{GetTokenQuery, TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the token already assigned to a URL, without creating one.
///
/// # Endpoint
///
/// `GET /get-token?url=<originalUrl>`
///
/// # Errors
///
/// - `400` if the `url` parameter is missing or the query string is malformed
/// - `404` if the URL has not been shortened
pub async fn get_token_handler(
    State(state): State<AppState>,
    query: Result<Query<GetTokenQuery>, QueryRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let url = query.url.unwrap_or_default();
    let mapping = state.url_service.find_by_original_url(&url).await?;

    Ok(Json(TokenResponse {
        short_token: mapping.short_token,
    }))
}
