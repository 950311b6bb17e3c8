//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::token_generator::is_well_formed_token;
use crate::utils::url_validator::with_default_scheme;

/// Redirects a short token to its original URL.
///
/// # Endpoint
///
/// `GET /{token}`
///
/// Each successful redirect increments the mapping's click counter by one.
/// The response is `302 Found`; stored URLs without a scheme are sent with
/// `https://`.
///
/// # Errors
///
/// Returns 404 Not Found if the token doesn't exist.
pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if !is_well_formed_token(&token) {
        return Err(super::token_not_found(&token));
    }

    let original_url = state.url_service.get_original_url(&token).await?;

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, with_default_scheme(&original_url))],
    ))
}
