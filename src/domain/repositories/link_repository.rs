//! Repository trait for link record storage.

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use async_trait::async_trait;
use std::time::Duration;

/// Infrastructure faults raised by a [`LinkRepository`].
///
/// None of these are retried by the repository itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("store operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("malformed record '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },

    #[error("no record with id '{0}'")]
    MissingRecord(String),

    /// The atomic create found the alias already claimed.
    #[error("alias already claimed: {0}")]
    AliasTaken(String),
}

/// Result type for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository interface for alias mappings.
///
/// The repository is the sole owner of persisted records. Callers receive
/// copies and never hold references into store state.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::RedisLinkRepository`] - Redis + RediSearch
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds the record whose alias equals `alias` exactly.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(LinkRecord))` if found
    /// - `Ok(None)` if no record has this alias
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on connectivity, query or timeout faults.
    /// A fault is never reported as `Ok(None)`.
    async fn find_by_alias(&self, alias: &str) -> StoreResult<Option<LinkRecord>>;

    /// Persists a new record with a freshly generated id and zero visits.
    ///
    /// The write is conditional on the alias being unclaimed and is atomic
    /// with respect to concurrent creates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AliasTaken`] if another record already holds the alias.
    async fn create(&self, new_record: NewLinkRecord) -> StoreResult<LinkRecord>;

    /// Atomically increments the visit counter of record `id` by one.
    ///
    /// Returns the counter value after the increment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingRecord`] if no record has this id. Nothing
    /// is written in that case.
    async fn increment_visits(&self, id: &str) -> StoreResult<u64>;

    /// Checks if the store backend is reachable.
    async fn health_check(&self) -> bool;
}
