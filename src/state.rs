//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AliasResolver, ShorteningService};
use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;

#[derive(Clone)]
pub struct AppState {
    pub shortening_service: Arc<ShorteningService<dyn LinkRepository>>,
    pub alias_resolver: Arc<AliasResolver<dyn LinkRepository>>,
    pub repository: Arc<dyn LinkRepository>,
    pub visit_sender: mpsc::Sender<VisitEvent>,
}

impl AppState {
    /// Wires both services to one store handle and one visit queue.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        visit_sender: mpsc::Sender<VisitEvent>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortening_service: Arc::new(ShorteningService::new(repository.clone(), base_url)),
            alias_resolver: Arc::new(AliasResolver::new(
                repository.clone(),
                visit_sender.clone(),
            )),
            repository,
            visit_sender,
        }
    }
}
