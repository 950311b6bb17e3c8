//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::short_url_service::ShortUrlService`] - Mapping creation, resolution, and stats

pub mod services;
