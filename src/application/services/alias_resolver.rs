//! Alias resolution for redirects.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;
use crate::domain::visit_worker::record_visit;
use crate::error::AppError;
use crate::utils::url_normalizer::ensure_protocol;

/// Maps an alias to its redirect target and counts the visit.
///
/// The visit is counted asynchronously: the resolver hands a
/// [`VisitEvent`] to the visit queue and returns without waiting for the
/// increment.
pub struct AliasResolver<L: LinkRepository + ?Sized + 'static> {
    repository: Arc<L>,
    visit_sender: mpsc::Sender<VisitEvent>,
}

impl<L: LinkRepository + ?Sized + 'static> AliasResolver<L> {
    pub fn new(repository: Arc<L>, visit_sender: mpsc::Sender<VisitEvent>) -> Self {
        Self {
            repository,
            visit_sender,
        }
    }

    /// Resolves an alias to the URL the caller should be redirected to.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(target))` with `https://` prepended if the stored target has
    ///   no `http://` or `https://` prefix
    /// - `Ok(None)` if no record has this alias; no visit is recorded
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lookup fails. Increment failures
    /// are never reported here.
    pub async fn resolve(&self, alias: &str) -> Result<Option<String>, AppError> {
        let Some(record) = self.repository.find_by_alias(alias).await? else {
            debug!(alias, "Alias not found");
            return Ok(None);
        };

        let target = ensure_protocol(&record.target_url);
        self.dispatch_visit(VisitEvent::new(record.id, record.alias));

        Ok(Some(target))
    }

    /// Queues a visit without waiting.
    ///
    /// If the queue is full or the worker is gone, the increment runs on its
    /// own task instead.
    fn dispatch_visit(&self, event: VisitEvent) {
        let event = match self.visit_sender.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => {
                warn!(alias = %event.alias, "Visit queue full, recording visit directly");
                event
            }
            Err(TrySendError::Closed(event)) => {
                warn!(alias = %event.alias, "Visit queue closed, recording visit directly");
                event
            }
        };

        let repository = self.repository.clone();
        tokio::spawn(async move {
            record_visit(repository.as_ref(), &event).await;
        });
    }
}
