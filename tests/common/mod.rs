#![allow(dead_code)]

use async_trait::async_trait;
use linkify::domain::entities::{LinkRecord, NewLinkRecord};
use linkify::domain::repositories::{LinkRepository, StoreError, StoreResult};
use linkify::domain::visit_event::VisitEvent;
use linkify::infrastructure::persistence::InMemoryLinkRepository;
use linkify::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "https://s.example.com";

pub fn create_test_state() -> (
    AppState,
    Arc<InMemoryLinkRepository>,
    mpsc::Receiver<VisitEvent>,
) {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let (tx, rx) = mpsc::channel(100);
    let state = AppState::new(repository.clone(), tx, BASE_URL);
    (state, repository, rx)
}

pub async fn create_test_link(
    repository: &InMemoryLinkRepository,
    alias: &str,
    url: &str,
) -> LinkRecord {
    repository
        .create(NewLinkRecord::new(alias, url))
        .await
        .unwrap()
}

/// State whose store fails every operation.
pub fn create_failing_state() -> (AppState, mpsc::Receiver<VisitEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let state = AppState::new(Arc::new(FailingRepository), tx, BASE_URL);
    (state, rx)
}

/// Store that times out on every call.
pub struct FailingRepository;

fn timeout(operation: &'static str) -> StoreError {
    StoreError::Timeout {
        operation,
        after: Duration::from_millis(1),
    }
}

#[async_trait]
impl LinkRepository for FailingRepository {
    async fn find_by_alias(&self, _alias: &str) -> StoreResult<Option<LinkRecord>> {
        Err(timeout("find_by_alias"))
    }

    async fn create(&self, _new_record: NewLinkRecord) -> StoreResult<LinkRecord> {
        Err(timeout("create"))
    }

    async fn increment_visits(&self, _id: &str) -> StoreResult<u64> {
        Err(timeout("increment_visits"))
    }

    async fn health_check(&self) -> bool {
        false
    }
}
