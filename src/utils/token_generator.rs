//! Short token generation.
//!
//! Tokens are drawn uniformly from a 62-symbol alphanumeric alphabet. The
//! randomness is injected through [`RandomSource`] so callers can swap the
//! operating system CSPRNG for a seeded generator.
//!
//! The generator knows nothing about stored mappings; collision handling is
//! the job of [`crate::application::services::ShortUrlService`].

use std::sync::Mutex;

use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::error::AppError;

/// Symbols a token is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Token length used when none is configured.
pub const DEFAULT_TOKEN_LENGTH: usize = 6;

/// Tokens that would be shadowed by fixed routes.
const RESERVED_TOKENS: &[&str] = &["health", "shorten", "stats"];

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// rejected so that `byte % 62` stays uniform.
const REJECTION_ZONE: u8 = 248;

/// Consecutive fills yielding no usable byte before the source is deemed broken.
const MAX_BARREN_FILLS: usize = 16;

/// Source of random bytes.
pub trait RandomSource: Send + Sync {
    /// Fills `buf` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RandomnessUnavailable`] if the source cannot
    /// produce entropy.
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        getrandom::fill(buf).map_err(|e| AppError::RandomnessUnavailable(e.to_string()))
    }
}

/// Deterministic source seeded from a `u64`.
///
/// Produces the same token sequence for the same seed; not suitable for
/// production tokens.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), AppError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AppError::RandomnessUnavailable("seeded rng lock poisoned".into()))?;
        rng.fill_bytes(buf);
        Ok(())
    }
}

/// Produces candidate tokens of a requested length.
#[cfg_attr(test, mockall::automock)]
pub trait TokenGenerator: Send + Sync {
    /// Generates a candidate token of exactly `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RandomnessUnavailable`] if the random source fails.
    fn generate(&self, length: usize) -> Result<String, AppError>;
}

/// Uniform generator over [`ALPHABET`].
pub struct AlphanumericGenerator<S: RandomSource = OsRandom> {
    source: S,
}

impl AlphanumericGenerator<OsRandom> {
    /// Creates a generator backed by the operating system CSPRNG.
    pub fn new() -> Self {
        Self { source: OsRandom }
    }
}

impl Default for AlphanumericGenerator<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RandomSource> AlphanumericGenerator<S> {
    /// Creates a generator backed by the given random source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }
}

impl<S: RandomSource> TokenGenerator for AlphanumericGenerator<S> {
    fn generate(&self, length: usize) -> Result<String, AppError> {
        let mut token = String::with_capacity(length);
        let mut buf = [0u8; 32];
        let mut barren_fills = 0;

        while token.len() < length {
            self.source.fill(&mut buf)?;

            let before = token.len();
            for &byte in buf.iter().filter(|&&b| b < REJECTION_ZONE) {
                if token.len() == length {
                    break;
                }
                token.push(ALPHABET[(byte % 62) as usize] as char);
            }

            if token.len() == before {
                barren_fills += 1;
                if barren_fills == MAX_BARREN_FILLS {
                    return Err(AppError::RandomnessUnavailable(
                        "random source produced no usable bytes".into(),
                    ));
                }
            } else {
                barren_fills = 0;
            }
        }

        Ok(token)
    }
}

/// Returns true if `token` collides with a fixed route.
pub fn is_reserved_token(token: &str) -> bool {
    RESERVED_TOKENS.contains(&token)
}

/// Returns true if `token` consists only of alphabet symbols.
pub fn is_well_formed_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphanumeric())
}
