//! Repository trait for URL mapping storage.

use std::fmt;

use crate::domain::entities::{NewMapping, ShortUrlMapping};
use async_trait::async_trait;

/// Column protected by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    OriginalUrl,
    ShortToken,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::OriginalUrl => f.write_str("original_url"),
            UniqueField::ShortToken => f.write_str("short_token"),
        }
    }
}

/// Errors reported by a mapping store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An insert was rejected because another mapping already owns the value.
    #[error("unique constraint violated on {0}")]
    ConstraintViolation(UniqueField),

    /// The store is unreachable or failed to execute the statement.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Repository interface for short URL mappings.
///
/// Implementations must enforce uniqueness of both `original_url` and
/// `short_token` at the store level, so that [`MappingRepository::insert_unique`]
/// is the authoritative collision check even when callers race.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryMappingRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Finds the mapping for an original URL.
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError>;

    /// Finds the mapping for a short token.
    async fn find_by_token(&self, short_token: &str)
    -> Result<Option<ShortUrlMapping>, StoreError>;

    /// Inserts a new mapping with `clicks = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConstraintViolation`] naming the offending column
    /// if either the URL or the token is already stored. Nothing is written
    /// in that case.
    async fn insert_unique(&self, new_mapping: NewMapping) -> Result<ShortUrlMapping, StoreError>;

    /// Atomically adds one to the click counter of a mapping.
    ///
    /// Returns the updated mapping, or `Ok(None)` without writing anything
    /// if the token is unknown.
    async fn increment_clicks(
        &self,
        short_token: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
