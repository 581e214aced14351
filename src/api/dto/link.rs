//! DTOs for link lookup endpoint.

use serde::Serialize;

/// Stored mapping with its visit count.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub alias: String,
    pub url: String,
    pub visits: u64,
    pub short_url: String,
}
