//! In-process implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{NewMapping, ShortUrlMapping};
use crate::domain::repositories::{MappingRepository, StoreError, UniqueField};

#[derive(Default)]
struct Tables {
    next_id: i64,
    by_token: HashMap<String, ShortUrlMapping>,
    /// original_url -> short_token
    by_url: HashMap<String, String>,
}

/// A mapping store held in process memory.
///
/// Both indexes live behind one lock, so the uniqueness check and the insert
/// happen in a single critical section. Data is lost when the process exits.
///
/// # Use Cases
///
/// - Development without PostgreSQL (`STORAGE_BACKEND=memory`)
/// - Tests exercising the create/resolve protocol under concurrency
pub struct MemoryMappingRepository {
    tables: RwLock<Tables>,
}

impl MemoryMappingRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory mapping store");
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Number of stored mappings.
    pub async fn len(&self) -> usize {
        self.tables.read().await.by_token.len()
    }

    /// Returns true if no mapping is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryMappingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingRepository for MemoryMappingRepository {
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .by_url
            .get(original_url)
            .and_then(|token| tables.by_token.get(token))
            .cloned())
    }

    async fn find_by_token(
        &self,
        short_token: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError> {
        Ok(self.tables.read().await.by_token.get(short_token).cloned())
    }

    async fn insert_unique(&self, new_mapping: NewMapping) -> Result<ShortUrlMapping, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.by_url.contains_key(&new_mapping.original_url) {
            return Err(StoreError::ConstraintViolation(UniqueField::OriginalUrl));
        }
        if tables.by_token.contains_key(&new_mapping.short_token) {
            return Err(StoreError::ConstraintViolation(UniqueField::ShortToken));
        }

        tables.next_id += 1;
        let mapping = ShortUrlMapping::new(
            tables.next_id,
            new_mapping.original_url,
            new_mapping.short_token,
            0,
            Utc::now(),
        );

        tables
            .by_url
            .insert(mapping.original_url.clone(), mapping.short_token.clone());
        tables
            .by_token
            .insert(mapping.short_token.clone(), mapping.clone());

        Ok(mapping)
    }

    async fn increment_clicks(
        &self,
        short_token: &str,
    ) -> Result<Option<ShortUrlMapping>, StoreError> {
        let mut tables = self.tables.write().await;

        Ok(tables.by_token.get_mut(short_token).map(|mapping| {
            mapping.clicks += 1;
            mapping.clone()
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
