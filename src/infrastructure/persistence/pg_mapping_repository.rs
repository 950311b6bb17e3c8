//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewMapping, ShortUrlMapping};
use crate::domain::repositories::{MappingRepository, StoreError};
use crate::utils::db_error::map_sqlx_error;

/// PostgreSQL repository for URL mappings.
///
/// Uniqueness of `original_url` and `short_token` is enforced by the
/// `short_urls` table constraints; click increments are a single `UPDATE`.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError> {
        sqlx::query_as::<_, ShortUrlMapping>(
            r#"
            SELECT id, original_url, short_token, clicks, created_at
            FROM short_urls
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_by_token(
        &self,
        short_token: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError> {
        sqlx::query_as::<_, ShortUrlMapping>(
            r#"
            SELECT id, original_url, short_token, clicks, created_at
            FROM short_urls
            WHERE short_token = $1
            "#,
        )
        .bind(short_token)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert_unique(&self, new_mapping: NewMapping) -> Result<ShortUrlMapping, StoreError> {
        sqlx::query_as::<_, ShortUrlMapping>(
            r#"
            INSERT INTO short_urls (original_url, short_token)
            VALUES ($1, $2)
            RETURNING id, original_url, short_token, clicks, created_at
            "#,
        )
        .bind(&new_mapping.original_url)
        .bind(&new_mapping.short_token)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn increment_clicks(
        &self,
        short_token: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError> {
        sqlx::query_as::<_, ShortUrlMapping>(
            r#"
            UPDATE short_urls
            SET clicks = clicks + 1
            WHERE short_token = $1
            RETURNING id, original_url, short_token, clicks, created_at
            "#,
        )
        .bind(short_token)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
