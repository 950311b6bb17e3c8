//! Utility functions for token generation, URL validation, and database errors.
//!
//! - [`token_generator`] - Random short token generation
//! - [`url_validator`] - Validation of submitted URLs
//! - [`db_error`] - SQLx error translation

pub mod db_error;
pub mod token_generator;
pub mod url_validator;
