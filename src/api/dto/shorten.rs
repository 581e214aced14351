//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};

use crate::application::services::ShortenedUrl;

/// Request to map an alias to a target URL.
///
/// Missing fields deserialize as empty strings so that they are reported by
/// the regular validation rules.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShortenRequest {
    /// Target URL. Also accepted as `urlToDirect`.
    #[serde(alias = "urlToDirect")]
    pub url: String,

    /// Requested alias. Also accepted as `shortenedUrlAlias`.
    #[serde(alias = "shortenedUrlAlias")]
    pub alias: String,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub alias: String,
    pub short_url: String,
}

impl From<ShortenedUrl> for ShortenResponse {
    fn from(shortened: ShortenedUrl) -> Self {
        Self {
            alias: shortened.alias,
            short_url: shortened.short_url,
        }
    }
}
