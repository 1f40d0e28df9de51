use std::collections::{HashMap, VecDeque};

use tokio::sync::{Mutex, oneshot};
use tracing::debug;

use admix_model::{AdAction, AdActionEvent, PlacementKind, ShowError, ShowOutcome};

/// Retained outcome records; older entries are dropped first.
const HISTORY_LIMIT: usize = 64;

#[derive(Debug)]
struct PendingRequest {
    kind: PlacementKind,
    rewarded_seen: bool,
    resolver: oneshot::Sender<ShowOutcome>,
}

/// Correlates in-flight show requests with the asynchronous provider events
/// that resolve them.
///
/// At most one request may be pending per placement name. An entry lives
/// from [`RequestCorrelator::begin`] until a terminal event, a local
/// failure, or [`RequestCorrelator::cancel_all`] removes it; every removal
/// resolves the caller's suspension, so no entry is ever left dangling.
#[derive(Debug, Default)]
pub struct RequestCorrelator {
    pending: Mutex<HashMap<String, PendingRequest>>,
    history: Mutex<VecDeque<ShowOutcome>>,
}

impl RequestCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a pending entry for `placement` and hand back the suspension it
    /// will be resolved through.
    pub async fn begin(
        &self,
        placement: &str,
        kind: PlacementKind,
    ) -> Result<oneshot::Receiver<ShowOutcome>, ShowError> {
        let mut pending = self.pending.lock().await;
        if pending.contains_key(placement) {
            return Err(ShowError::AlreadyPending);
        }
        let (resolver, suspension) = oneshot::channel();
        pending.insert(
            placement.to_owned(),
            PendingRequest {
                kind,
                rewarded_seen: false,
                resolver,
            },
        );
        Ok(suspension)
    }

    /// Apply one published event, in publication order.
    ///
    /// Returns the outcome the event produced, if any: a resolution of the
    /// matching pending entry, or a synthesized record for an unmatched
    /// close. Unmatched failures and informational events produce nothing.
    pub async fn observe(&self, event: &AdActionEvent) -> Option<ShowOutcome> {
        let mut pending = self.pending.lock().await;
        match event.action {
            AdAction::Rewarded => {
                if let Some(entry) = pending.get_mut(&event.placement) {
                    entry.rewarded_seen = true;
                }
                None
            }
            AdAction::Closed => {
                let outcome = match pending.remove(&event.placement) {
                    Some(entry) => {
                        let outcome = ShowOutcome::completed(
                            &event.placement,
                            entry.kind,
                            entry.rewarded_seen,
                        );
                        let _ = entry.resolver.send(outcome.clone());
                        outcome
                    }
                    // Tolerated: a close with no pending entry still yields a
                    // consistent record for downstream consumers.
                    None => ShowOutcome::completed(&event.placement, event.kind, false),
                };
                drop(pending);
                self.record(outcome.clone()).await;
                Some(outcome)
            }
            AdAction::Failed => {
                let entry = pending.remove(&event.placement)?;
                let outcome = ShowOutcome::failure(
                    &event.placement,
                    entry.kind,
                    ShowError::ProviderShowFailed {
                        code: event.error_code,
                        message: event.message.clone(),
                    },
                );
                let _ = entry.resolver.send(outcome.clone());
                drop(pending);
                self.record(outcome.clone()).await;
                Some(outcome)
            }
            _ => None,
        }
    }

    /// Resolve a pending entry locally, without a provider event. Used when
    /// the show call itself is rejected. Returns `None` when the entry was
    /// already resolved.
    pub async fn fail(
        &self,
        placement: &str,
        kind: PlacementKind,
        error: ShowError,
    ) -> Option<ShowOutcome> {
        let entry = self.pending.lock().await.remove(placement)?;
        let outcome = ShowOutcome::failure(placement, kind, error);
        let _ = entry.resolver.send(outcome.clone());
        self.record(outcome.clone()).await;
        Some(outcome)
    }

    /// Drain every pending entry, resolving each with a cancelled outcome.
    pub async fn cancel_all(&self) {
        let drained: Vec<(String, PendingRequest)> =
            self.pending.lock().await.drain().collect();
        if drained.is_empty() {
            return;
        }
        debug!(count = drained.len(), "cancelling pending show requests");
        for (placement, entry) in drained {
            let outcome = ShowOutcome::failure(&placement, entry.kind, ShowError::Cancelled);
            let _ = entry.resolver.send(outcome.clone());
            self.record(outcome).await;
        }
    }

    pub async fn is_pending(&self, placement: &str) -> bool {
        self.pending.lock().await.contains_key(placement)
    }

    /// Snapshot of recent outcomes, oldest first.
    pub async fn history(&self) -> Vec<ShowOutcome> {
        self.history.lock().await.iter().cloned().collect()
    }

    async fn record(&self, outcome: ShowOutcome) {
        let mut history = self.history.lock().await;
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(outcome);
    }
}
