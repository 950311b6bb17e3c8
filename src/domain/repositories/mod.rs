//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`MappingRepository`] - Unique-constrained mapping storage with atomic click increments

pub mod mapping_repository;

pub use mapping_repository::{MappingRepository, StoreError, UniqueField};

#[cfg(test)]
pub use mapping_repository::MockMappingRepository;
