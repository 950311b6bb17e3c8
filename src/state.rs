//! Shared application state injected into request handlers.

use std::sync::Arc;

use crate::application::services::ShortUrlService;

/// Application state shared across all request handlers.
///
/// Cheap to clone; the service is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<ShortUrlService>,
}

impl AppState {
    pub fn new(url_service: Arc<ShortUrlService>) -> Self {
        Self { url_service }
    }
}
