//! Link repository implementations.
//!
//! # Repositories
//!
//! - [`RedisLinkRepository`] - Redis hashes searched through a RediSearch index
//! - [`InMemoryLinkRepository`] - Process-local store for development and tests

pub mod memory_link_repository;
pub mod redis_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use redis_link_repository::{RedisLinkRepository, RedisStoreOptions};
