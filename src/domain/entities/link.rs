//! Link record entity representing an alias-to-URL mapping.

use serde::Serialize;

/// A persisted alias mapping with its visit counter.
///
/// Everything except `visits` is fixed at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRecord {
    /// Opaque identifier, the store's primary key.
    pub id: String,
    pub alias: String,
    pub target_url: String,
    pub visits: u64,
}

impl LinkRecord {
    /// Creates a new LinkRecord instance.
    pub fn new(id: String, alias: String, target_url: String, visits: u64) -> Self {
        Self {
            id,
            alias,
            target_url,
            visits,
        }
    }
}

/// Input data for creating a new link record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinkRecord {
    pub alias: String,
    pub target_url: String,
}

impl NewLinkRecord {
    pub fn new(alias: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            target_url: target_url.into(),
        }
    }

    /// Builds the record as it is first persisted: zero visits, given id.
    pub fn into_record(self, id: String) -> LinkRecord {
        LinkRecord::new(id, self.alias, self.target_url, 0)
    }
}
