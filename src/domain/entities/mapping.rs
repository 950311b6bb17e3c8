//! Mapping entity representing a shortened URL.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The persisted association between an original URL and its short token.
///
/// Both `original_url` and `short_token` are unique across all mappings.
/// `clicks` starts at zero and is only ever incremented by the store.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortUrlMapping {
    pub id: i64,
    pub original_url: String,
    pub short_token: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortUrlMapping {
    /// Creates a new ShortUrlMapping instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_token: String,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_token,
            clicks,
            created_at,
        }
    }
}

/// Input data for inserting a new mapping.
///
/// The store assigns `id` and `created_at` and starts `clicks` at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub original_url: String,
    pub short_token: String,
}

/// Usage statistics for a single mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStats {
    pub original_url: String,
    pub short_token: String,
    pub clicks: i64,
}

impl From<ShortUrlMapping> for UrlStats {
    fn from(mapping: ShortUrlMapping) -> Self {
        Self {
            original_url: mapping.original_url,
            short_token: mapping.short_token,
            clicks: mapping.clicks,
        }
    }
}
