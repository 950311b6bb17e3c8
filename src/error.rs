//! Application error type and its HTTP representation.
//!
//! [`AppError`] carries both the error kinds surfaced by the mapping core
//! (`NotFound`, `TokenSpaceExhausted`, `StoreUnavailable`,
//! `RandomnessUnavailable`, `Cancelled`) and the request-level rejections
//! produced by the HTTP layer before the core is reached.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No mapping matches the requested token or original URL.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The collision-retry loop ran past its bound without persisting a token.
    #[error("Token space exhausted after {attempts} attempts")]
    TokenSpaceExhausted { attempts: u32 },

    /// The persistent store could not be reached or returned an error.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The random source backing token generation failed.
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    /// The operation was abandoned before completing.
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Unprocessable { message: String, details: Value },

    #[error("{message}")]
    Forbidden { message: String, details: Value },

    #[error("{message}")]
    MethodNotAllowed { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unprocessable(message: impl Into<String>, details: Value) -> Self {
        Self::Unprocessable {
            message: message.into(),
            details,
        }
    }

    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn method_not_allowed(message: impl Into<String>, details: Value) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::TokenSpaceExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RandomnessUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Cancelled(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::TokenSpaceExhausted { .. } => "token_space_exhausted",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::RandomnessUnavailable(_) => "randomness_unavailable",
            AppError::Cancelled(_) => "cancelled",
            AppError::Validation { .. } => "validation_error",
            AppError::Unprocessable { .. } => "unprocessable_entity",
            AppError::Forbidden { .. } => "forbidden",
            AppError::MethodNotAllowed { .. } => "method_not_allowed",
        }
    }

    /// Converts the error into its client-facing payload.
    ///
    /// Store and randomness failures are reported with a generic message; the
    /// underlying cause is logged instead of leaked.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::NotFound { message, details }
            | AppError::Validation { message, details }
            | AppError::Unprocessable { message, details }
            | AppError::Forbidden { message, details }
            | AppError::MethodNotAllowed { message, details } => {
                (message.clone(), details.clone())
            }
            AppError::TokenSpaceExhausted { attempts } => (
                "Unable to allocate a unique short token".to_string(),
                json!({ "attempts": attempts }),
            ),
            AppError::StoreUnavailable(_) => ("Storage is unavailable".to_string(), json!({})),
            AppError::RandomnessUnavailable(_) => {
                ("Internal server error".to_string(), json!({}))
            }
            AppError::Cancelled(_) => ("Request timed out".to_string(), json!({})),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(reason) => AppError::StoreUnavailable(reason),
            // Only reachable when a constraint violation escapes the retry loop.
            StoreError::ConstraintViolation(field) => AppError::StoreUnavailable(format!(
                "unexpected unique constraint violation on {field}"
            )),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());

        AppError::bad_request(message, json!({ "fields": errors.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // A request without a JSON body carries no URL.
            JsonRejection::MissingJsonContentType(_) => {
                AppError::bad_request("URL is required", json!({}))
            }
            JsonRejection::JsonSyntaxError(e) => AppError::bad_request(
                "Request body is not valid JSON",
                json!({ "reason": e.body_text() }),
            ),
            JsonRejection::JsonDataError(e) => AppError::unprocessable(
                "Request body has an invalid shape",
                json!({ "reason": e.body_text() }),
            ),
            other => AppError::bad_request(
                "Request body could not be read",
                json!({ "reason": other.body_text() }),
            ),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "Invalid query string",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
