//! Repository trait definitions for the domain layer.
//!
//! The store is abstracted behind [`LinkRepository`] so services can be
//! constructed with any backend: Redis in production, the in-memory store in
//! development, and `mockall` mocks in unit tests.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod link_repository;

pub use link_repository::{LinkRepository, StoreError, StoreResult};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
