//! Infrastructure layer for external integrations.
//!
//! This layer implements the store interface defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Redis and in-memory repository implementations

pub mod persistence;
