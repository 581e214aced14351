//! Short link creation and lookup service.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{LinkRecord, NewLinkRecord};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, CONFLICT_MESSAGE};
use crate::utils::validator::{
    ALIAS_MAX_LENGTH, ALIAS_MIN_LENGTH, URL_MAX_LENGTH, ValidationError, is_valid_alias,
    is_valid_url,
};

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenedUrl {
    pub alias: String,
    pub short_url: String,
}

/// Service for creating and retrieving alias mappings.
///
/// Owns the order in which a submission is checked, so that a request that
/// breaks several rules always gets the same error.
pub struct ShorteningService<L: LinkRepository + ?Sized> {
    repository: Arc<L>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> ShorteningService<L> {
    /// Creates a new service producing short URLs under `base_url`.
    pub fn new(repository: Arc<L>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Validates a submission and stores the mapping.
    ///
    /// # Check Order
    ///
    /// 1. Empty alias
    /// 2. Target is not a valid URL
    /// 3. Alias has characters outside `[A-Za-z0-9_-]`
    /// 4. Alias longer than 50 or URL longer than 2000 characters
    /// 5. Alias shorter than 5 characters
    /// 6. Alias already in use
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first failed rule,
    /// [`AppError::Conflict`] if the alias is taken (including a lost race on
    /// the store's atomic create), and [`AppError::Internal`] on store faults.
    pub async fn create_short_link(
        &self,
        target_url: &str,
        alias: &str,
    ) -> Result<ShortenedUrl, AppError> {
        check_submission(target_url, alias)?;

        if self.repository.find_by_alias(alias).await?.is_some() {
            debug!(alias, "Alias already in use");
            return Err(AppError::conflict(
                CONFLICT_MESSAGE,
                json!({ "alias": alias }),
            ));
        }

        let record = self
            .repository
            .create(NewLinkRecord::new(alias, target_url))
            .await?;

        counter!("linkify_links_created_total").increment(1);
        info!(alias = %record.alias, id = %record.id, "Short link created");

        Ok(ShortenedUrl {
            short_url: self.short_url(&record.alias),
            alias: record.alias,
        })
    }

    /// Retrieves the stored record for an alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this alias.
    pub async fn get_link(&self, alias: &str) -> Result<LinkRecord, AppError> {
        self.repository
            .find_by_alias(alias)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))
    }

    /// Builds the public short URL for an alias.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.base_url, alias)
    }
}

fn check_submission(target_url: &str, alias: &str) -> Result<(), ValidationError> {
    if alias.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !is_valid_url(target_url) {
        return Err(ValidationError::BadUrl);
    }
    if !is_valid_alias(alias) {
        return Err(ValidationError::BadAlias);
    }

    // The alias is ASCII at this point, so its byte length is its char count.
    if alias.len() > ALIAS_MAX_LENGTH || target_url.chars().count() > URL_MAX_LENGTH {
        return Err(ValidationError::TooLong);
    }
    if alias.len() < ALIAS_MIN_LENGTH {
        return Err(ValidationError::TooShort);
    }

    Ok(())
}
