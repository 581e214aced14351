//! Background worker that applies visit increments.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::domain::repositories::LinkRepository;
use crate::domain::visit_event::VisitEvent;

/// Consumes visit events until every sender is dropped.
///
/// At most `concurrency` increments are in flight at once. When the channel
/// closes the worker waits for the in-flight increments before returning, so
/// a graceful shutdown does not lose counted visits.
pub async fn run_visit_worker<L>(
    mut rx: mpsc::Receiver<VisitEvent>,
    repository: Arc<L>,
    concurrency: usize,
) where
    L: LinkRepository + ?Sized + 'static,
{
    let limiter = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = limiter.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        in_flight.spawn(async move {
            record_visit(repository.as_ref(), &event).await;
            drop(permit);
        });

        // Reap finished tasks so the set does not grow with the queue.
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Visit worker stopped");
}

/// Applies a single visit increment, logging instead of failing.
pub async fn record_visit<L>(repository: &L, event: &VisitEvent)
where
    L: LinkRepository + ?Sized,
{
    match repository.increment_visits(&event.record_id).await {
        Ok(visits) => {
            counter!("linkify_visits_recorded_total").increment(1);
            debug!(alias = %event.alias, visits, "Visit recorded");
        }
        Err(e) => {
            counter!("linkify_visit_increments_failed_total").increment(1);
            warn!(
                alias = %event.alias,
                record_id = %event.record_id,
                error = %e,
                "Failed to record visit"
            );
        }
    }
}
