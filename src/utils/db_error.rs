//! Translation of SQLx errors into store errors.

use crate::domain::repositories::{StoreError, UniqueField};

/// Unique constraint guarding `short_urls.original_url`.
pub const ORIGINAL_URL_CONSTRAINT: &str = "short_urls_original_url_key";

/// Unique constraint guarding `short_urls.short_token`.
pub const SHORT_TOKEN_CONSTRAINT: &str = "short_urls_short_token_key";

/// Returns the column whose unique constraint `e` violated, if any.
pub fn unique_violation_field(e: &sqlx::Error) -> Option<UniqueField> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    match db_err.constraint() {
        Some(ORIGINAL_URL_CONSTRAINT) => Some(UniqueField::OriginalUrl),
        Some(SHORT_TOKEN_CONSTRAINT) => Some(UniqueField::ShortToken),
        _ => None,
    }
}

/// Maps an SQLx error onto [`StoreError`].
///
/// Unique violations on the two mapping constraints become
/// [`StoreError::ConstraintViolation`]; everything else is reported as
/// [`StoreError::Unavailable`].
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match unique_violation_field(&e) {
        Some(field) => StoreError::ConstraintViolation(field),
        None => StoreError::Unavailable(e.to_string()),
    }
}
