//! Visit event model for asynchronous visit counting.

/// A resolved redirect whose visit still has to be counted.
///
/// Created by the alias resolver after it has decided the redirect target,
/// sent to the visit queue without waiting, and consumed by
/// [`crate::domain::visit_worker::run_visit_worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    /// Store id of the visited record.
    pub record_id: String,
    /// Alias that was requested, kept for logging.
    pub alias: String,
}

impl VisitEvent {
    pub fn new(record_id: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            alias: alias.into(),
        }
    }
}
