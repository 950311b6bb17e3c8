//! Core domain entities.
//!
//! - [`ShortUrlMapping`] - A persisted original URL / short token association
//! - [`NewMapping`] - Insert payload for a mapping that does not exist yet
//! - [`UrlStats`] - Read-only usage projection of a mapping

pub mod mapping;

pub use mapping::{NewMapping, ShortUrlMapping, UrlStats};
