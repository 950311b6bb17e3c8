//! DTOs for token lookup by original URL.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query string of `GET /get-token`.
#[derive(Debug, Deserialize, Validate)]
pub struct GetTokenQuery {
    #[validate(
        required(message = "URL query parameter is required"),
        length(min = 1, message = "URL query parameter is required")
    )]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub short_token: String,
}
