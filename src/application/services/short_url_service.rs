//! Short URL creation, resolution, and statistics.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewMapping, ShortUrlMapping, UrlStats};
use crate::domain::repositories::{MappingRepository, StoreError, UniqueField};
use crate::error::AppError;
use crate::utils::token_generator::{DEFAULT_TOKEN_LENGTH, TokenGenerator, is_reserved_token};

/// Default bound on a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Token length and collision-retry bounds.
///
/// Candidates start at `length` characters. After `max_attempts` collisions
/// at one length the candidate length grows by one, up to `max_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub length: usize,
    pub max_attempts: u32,
    pub max_length: usize,
}

impl TokenPolicy {
    /// Policy with a fixed token length.
    pub fn fixed(length: usize, max_attempts: u32) -> Self {
        Self {
            length,
            max_attempts,
            max_length: length,
        }
    }

    /// Upper bound on candidates tried by a single creation.
    pub fn total_attempts(&self) -> u32 {
        let lengths = self.max_length.saturating_sub(self.length) as u32 + 1;
        self.max_attempts.saturating_mul(lengths)
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_TOKEN_LENGTH, 10)
    }
}

/// Coordinates mapping creation and resolution against the store.
///
/// Idempotence and uniqueness rest on the store's unique constraints: a
/// preceding read is only an optimisation, and a constraint violation on
/// insert is the authoritative collision signal. Click accounting is
/// delegated to the store's atomic increment.
///
/// The service holds no mutable state and is shared across request handlers
/// through `Arc`.
pub struct ShortUrlService<
    R: MappingRepository + ?Sized = dyn MappingRepository,
    G: TokenGenerator + ?Sized = dyn TokenGenerator,
> {
    repository: Arc<R>,
    generator: Arc<G>,
    policy: TokenPolicy,
    store_timeout: Duration,
}

impl<R, G> ShortUrlService<R, G>
where
    R: MappingRepository + ?Sized,
    G: TokenGenerator + ?Sized,
{
    /// Creates a service with the default token policy and store timeout.
    pub fn new(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self {
            repository,
            generator,
            policy: TokenPolicy::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the deadline applied to every store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Returns the mapping for `original_url`, creating it on first request.
    ///
    /// Repeated calls with the same URL, including concurrent ones, return the
    /// same token and leave exactly one stored mapping.
    ///
    /// The caller is expected to pass a validated, non-empty URL.
    ///
    /// # Errors
    ///
    /// - [`AppError::TokenSpaceExhausted`] if every candidate within the
    ///   [`TokenPolicy`] bound collided
    /// - [`AppError::StoreUnavailable`] if the store failed
    /// - [`AppError::RandomnessUnavailable`] if token generation failed
    /// - [`AppError::Cancelled`] if a store call exceeded its deadline
    pub async fn create_short_url(
        &self,
        original_url: &str,
    ) -> Result<ShortUrlMapping, AppError> {
        if let Some(existing) = self.lookup_by_url(original_url).await? {
            debug!(token = %existing.short_token, "Returning existing mapping");
            return Ok(existing);
        }

        let total_attempts = self.policy.total_attempts();
        let mut length = self.policy.length;
        let mut attempts_at_length = 0;

        for attempt in 1..=total_attempts {
            if attempts_at_length == self.policy.max_attempts {
                length += 1;
                attempts_at_length = 0;
                debug!(length, "Growing token length after repeated collisions");
            }
            attempts_at_length += 1;

            let candidate = self.generator.generate(length)?;

            if is_reserved_token(&candidate) {
                debug!(attempt, token = %candidate, "Discarding reserved token");
                continue;
            }

            if self
                .bounded("find_by_token", self.repository.find_by_token(&candidate))
                .await??
                .is_some()
            {
                debug!(attempt, token = %candidate, "Token collision");
                continue;
            }

            let new_mapping = NewMapping {
                original_url: original_url.to_string(),
                short_token: candidate,
            };

            match self
                .bounded("insert_unique", self.repository.insert_unique(new_mapping))
                .await?
            {
                Ok(mapping) => {
                    info!(token = %mapping.short_token, attempt, "Created short URL");
                    return Ok(mapping);
                }
                Err(StoreError::ConstraintViolation(UniqueField::ShortToken)) => {
                    debug!(attempt, "Token claimed concurrently, retrying");
                }
                Err(StoreError::ConstraintViolation(UniqueField::OriginalUrl)) => {
                    if let Some(existing) = self.lookup_by_url(original_url).await? {
                        debug!(token = %existing.short_token, "URL inserted concurrently");
                        return Ok(existing);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(attempts = total_attempts, "Token space exhausted");
        Err(AppError::TokenSpaceExhausted {
            attempts: total_attempts,
        })
    }

    /// Resolves a token to its original URL, counting one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is unknown; nothing is
    /// written in that case.
    pub async fn get_original_url(&self, short_token: &str) -> Result<String, AppError> {
        let mapping = self
            .bounded(
                "increment_clicks",
                self.repository.increment_clicks(short_token),
            )
            .await??
            .ok_or_else(|| token_not_found(short_token))?;

        debug!(token = %mapping.short_token, clicks = mapping.clicks, "Resolved short URL");

        Ok(mapping.original_url)
    }

    /// Returns usage statistics for a token without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the token is unknown.
    pub async fn get_stats(&self, short_token: &str) -> Result<UrlStats, AppError> {
        self.bounded("find_by_token", self.repository.find_by_token(short_token))
            .await??
            .map(UrlStats::from)
            .ok_or_else(|| token_not_found(short_token))
    }

    /// Looks up the mapping of an original URL without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the URL has not been shortened.
    pub async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<ShortUrlMapping, AppError> {
        self.lookup_by_url(original_url).await?.ok_or_else(|| {
            AppError::not_found("URL not found", json!({ "originalUrl": original_url }))
        })
    }

    /// Checks that the store answers within the deadline.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.bounded("ping", self.repository.ping()).await??;
        Ok(())
    }

    async fn lookup_by_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortUrlMapping>, AppError> {
        Ok(self
            .bounded(
                "find_by_original_url",
                self.repository.find_by_original_url(original_url),
            )
            .await??)
    }

    /// Runs a store call under the configured deadline.
    ///
    /// The outer result reports the deadline; the inner one is the store's own
    /// answer, left for the caller to inspect.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<Result<T, StoreError>, AppError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                warn!(
                    operation,
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                AppError::Cancelled(format!(
                    "{operation} exceeded {}ms",
                    self.store_timeout.as_millis()
                ))
            })
    }
}

fn token_not_found(short_token: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "shortToken": short_token }))
}
