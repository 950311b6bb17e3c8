//! HTTP request handlers for API endpoints.

pub mod fallback;
pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;
pub mod token;

pub use fallback::{not_found_handler, shorten_method_not_allowed};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;
pub use token::get_token_handler;

use serde_json::json;

use crate::error::AppError;

/// Rejection for path tokens that cannot exist in the store.
fn token_not_found(token: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "shortToken": token }))
}
