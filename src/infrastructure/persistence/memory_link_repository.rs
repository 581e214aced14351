//! Process-local implementation of the link repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};

/// In-memory link store backed by two `DashMap`s.
///
/// `aliases` is the unique alias index, `records` holds the records keyed by
/// id. A create claims the alias through the map's entry API, so the
/// uniqueness check and the write happen under one shard lock. Lock order is
/// always `aliases` then `records`.
///
/// Used when no Redis instance is configured, and as a substitute store in
/// tests.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    aliases: DashMap<String, String>,
    records: DashMap<String, LinkRecord>,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        debug!("Using in-memory link store");
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_alias(&self, alias: &str) -> StoreResult<Option<LinkRecord>> {
        let Some(id) = self.aliases.get(alias).map(|id| id.value().clone()) else {
            return Ok(None);
        };

        Ok(self.records.get(&id).map(|record| record.value().clone()))
    }

    async fn create(&self, new_record: NewLinkRecord) -> StoreResult<LinkRecord> {
        match self.aliases.entry(new_record.alias.clone()) {
            Entry::Occupied(_) => Err(StoreError::AliasTaken(new_record.alias)),
            Entry::Vacant(slot) => {
                let id = Uuid::new_v4().to_string();
                let record = new_record.into_record(id.clone());

                self.records.insert(id.clone(), record.clone());
                slot.insert(id);

                Ok(record)
            }
        }
    }

    async fn increment_visits(&self, id: &str) -> StoreResult<u64> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingRecord(id.to_string()))?;

        record.visits += 1;
        Ok(record.visits)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
