//! Fallback handlers for unmatched routes and methods.

use axum::http::{Method, Uri};
use serde_json::json;

use crate::error::AppError;

/// Answers requests that match no route.
pub async fn not_found_handler(method: Method, uri: Uri) -> AppError {
    AppError::not_found(
        format!("Endpoint {} {} does not exist", method, uri.path()),
        json!({}),
    )
}

/// Answers non-POST requests to `/shorten`.
pub async fn shorten_method_not_allowed(method: Method) -> AppError {
    AppError::method_not_allowed(
        format!("Method {method} is not allowed. Only POST"),
        json!({ "allowed": ["POST"] }),
    )
}
