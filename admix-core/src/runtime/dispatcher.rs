use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use admix_model::{AdAction, AdActionEvent, PlacementKind, ProviderEvent};

use crate::correlation::RequestCorrelator;
use crate::reload::ReloadScheduler;
use crate::runtime::event_bus::{AdEventPublisher, InProcAdEventBus, OutcomePublisher};

/// Routes raw provider callbacks through the bus, the correlator, and the
/// reload scheduler, preserving arrival order for every placement.
pub(crate) struct EventDispatcher {
    bus: Arc<InProcAdEventBus>,
    correlator: Arc<RequestCorrelator>,
    scheduler: Arc<ReloadScheduler>,
    initialized: watch::Sender<bool>,
}

impl EventDispatcher {
    pub(crate) fn new(
        bus: Arc<InProcAdEventBus>,
        correlator: Arc<RequestCorrelator>,
        scheduler: Arc<ReloadScheduler>,
        initialized: watch::Sender<bool>,
    ) -> Self {
        Self {
            bus,
            correlator,
            scheduler,
            initialized,
        }
    }

    /// Consume provider callbacks until shutdown or the provider side drops
    /// its sender. Outstanding requests are cancelled on the way out.
    pub(crate) async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<ProviderEvent>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = events.recv() => match received {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
            }
        }
        self.correlator.cancel_all().await;
    }

    async fn handle(&self, raw: ProviderEvent) {
        if matches!(raw, ProviderEvent::SdkInitialized) {
            info!("ad provider initialized");
            let _ = self.initialized.send(true);
            return;
        }

        let Some(event) = normalize(raw) else { return };
        debug!(placement = %event.placement, action = ?event.action, "ad event");

        let _ = self.bus.publish(event.clone()).await;
        if let Some(outcome) = self.correlator.observe(&event).await {
            let _ = self.bus.publish_outcome(outcome).await;
        }
        if matches!(event.action, AdAction::Unavailable | AdAction::Failed) {
            let scheduler = Arc::clone(&self.scheduler);
            tokio::spawn(async move {
                scheduler.maybe_reload().await;
            });
        }
    }
}

/// Map a raw SDK callback onto the normalized action stream.
///
/// `SdkInitialized` is runtime state, not a placement action, and maps to
/// nothing here.
fn normalize(raw: ProviderEvent) -> Option<AdActionEvent> {
    use PlacementKind::{Interstitial, Rewarded};

    let event = match raw {
        ProviderEvent::SdkInitialized => return None,

        ProviderEvent::RewardedAvailable { placement } => {
            AdActionEvent::new(placement, Rewarded, AdAction::Available)
        }
        ProviderEvent::RewardedUnavailable => {
            AdActionEvent::new("", Rewarded, AdAction::Unavailable)
        }
        ProviderEvent::RewardedOpened { placement } => {
            AdActionEvent::new(placement, Rewarded, AdAction::Opened)
        }
        ProviderEvent::RewardedClosed { placement } => {
            AdActionEvent::new(placement, Rewarded, AdAction::Closed)
        }
        ProviderEvent::RewardedClicked { placement } => {
            AdActionEvent::new(placement, Rewarded, AdAction::Clicked)
        }
        ProviderEvent::RewardedEarned { placement, reward } => {
            AdActionEvent::new(placement, Rewarded, AdAction::Rewarded).with_message(reward)
        }
        ProviderEvent::RewardedShowFailed {
            placement,
            code,
            message,
        } => AdActionEvent::new(placement, Rewarded, AdAction::Failed)
            .with_message(message)
            .with_error_code(code),

        ProviderEvent::InterstitialReady { placement } => {
            AdActionEvent::new(placement, Interstitial, AdAction::Available)
        }
        ProviderEvent::InterstitialLoadFailed { code, message } => {
            AdActionEvent::new("", Interstitial, AdAction::Unavailable)
                .with_message(message)
                .with_error_code(code)
        }
        ProviderEvent::InterstitialOpened { placement } => {
            AdActionEvent::new(placement, Interstitial, AdAction::Opened)
        }
        ProviderEvent::InterstitialClicked { placement } => {
            AdActionEvent::new(placement, Interstitial, AdAction::Clicked)
        }
        ProviderEvent::InterstitialShowSucceeded { placement } => {
            AdActionEvent::new(placement, Interstitial, AdAction::Opened)
        }
        ProviderEvent::InterstitialShowFailed {
            placement,
            code,
            message,
        } => AdActionEvent::new(placement, Interstitial, AdAction::Failed)
            .with_message(message)
            .with_error_code(code),
        ProviderEvent::InterstitialClosed { placement } => {
            AdActionEvent::new(placement, Interstitial, AdAction::Closed)
        }
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_callbacks_normalize_to_terminal_actions() {
        let closed = normalize(ProviderEvent::RewardedClosed {
            placement: "menu".into(),
        })
        .expect("event");
        assert_eq!(closed.action, AdAction::Closed);
        assert!(closed.is_terminal());

        let failed = normalize(ProviderEvent::InterstitialShowFailed {
            placement: "menu".into(),
            code: 509,
            message: "no fill".into(),
        })
        .expect("event");
        assert_eq!(failed.action, AdAction::Failed);
        assert_eq!(failed.error_code, Some(509));
        assert_eq!(failed.kind, PlacementKind::Interstitial);
    }

    #[test]
    fn load_failures_normalize_to_unavailable() {
        let event = normalize(ProviderEvent::InterstitialLoadFailed {
            code: 510,
            message: "network".into(),
        })
        .expect("event");
        assert_eq!(event.action, AdAction::Unavailable);
        assert!(event.placement.is_empty());
    }

    #[test]
    fn initialization_has_no_stream_counterpart() {
        assert!(normalize(ProviderEvent::SdkInitialized).is_none());
    }
}
