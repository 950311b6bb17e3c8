//! Business logic services for the application layer.

pub mod short_url_service;

pub use short_url_service::{DEFAULT_STORE_TIMEOUT, ShortUrlService, TokenPolicy};
