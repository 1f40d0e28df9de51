use std::{any::type_name_of_val, fmt, sync::Arc};

use futures::Stream;
use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use admix_contracts::AdProvider;
use admix_model::{AdAction, AdActionEvent, PlacementKind, ProviderEvent, ShowError, ShowOutcome};

use crate::availability::AvailabilityGate;
use crate::config::AdsConfig;
use crate::correlation::RequestCorrelator;
use crate::error::{AdsError, Result};
use crate::registry::PlacementRegistry;
use crate::reload::ReloadScheduler;
use crate::runtime::dispatcher::EventDispatcher;
use crate::runtime::event_bus::{AdEventPublisher, InProcAdEventBus, OutcomePublisher};

/// Facade over the ad-show pipeline: availability gating, single-flight
/// request correlation, event publication, and cooldown-gated reloads.
///
/// One dispatcher task owns callback routing; everything hangs off the
/// service's cancellation token, so [`AdsService::shutdown`] resolves every
/// outstanding request with a cancelled outcome before the task exits.
pub struct AdsService {
    config: AdsConfig,
    registry: Arc<PlacementRegistry>,
    provider: Arc<dyn AdProvider>,
    gate: AvailabilityGate,
    bus: Arc<InProcAdEventBus>,
    correlator: Arc<RequestCorrelator>,
    scheduler: Arc<ReloadScheduler>,
    initialized: watch::Receiver<bool>,
    shutdown: CancellationToken,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for AdsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let provider_type = type_name_of_val(self.provider.as_ref());
        f.debug_struct("AdsService")
            .field("placements", &self.registry.len())
            .field("provider_type", &provider_type)
            .field("initialized", &*self.initialized.borrow())
            .field("shutdown_cancelled", &self.shutdown.is_cancelled())
            .finish()
    }
}

impl AdsService {
    /// Wire the pipeline and start its dispatcher task. Must be called from
    /// within a Tokio runtime.
    ///
    /// `events` is the channel the provider integration feeds raw SDK
    /// callbacks into. When ads are enabled the provider is initialized in
    /// the background; show requests resolve as provider-unavailable until
    /// the SDK confirms initialization.
    pub fn start(
        config: AdsConfig,
        provider: Arc<dyn AdProvider>,
        events: mpsc::UnboundedReceiver<ProviderEvent>,
    ) -> Result<Arc<Self>> {
        if config.event_capacity == 0 {
            return Err(AdsError::Config(
                "event_capacity must be non-zero".to_owned(),
            ));
        }
        let registry = Arc::new(PlacementRegistry::from_descriptors(
            config.placements.clone(),
        )?);
        let bus = Arc::new(InProcAdEventBus::new(config.event_capacity));
        let correlator = Arc::new(RequestCorrelator::new());
        let shutdown = CancellationToken::new();
        let scheduler = Arc::new(ReloadScheduler::new(
            Arc::clone(&provider),
            config.reload_interval(),
            shutdown.child_token(),
        ));

        let (init_tx, init_rx) = watch::channel(false);
        let dispatcher = EventDispatcher::new(
            Arc::clone(&bus),
            Arc::clone(&correlator),
            Arc::clone(&scheduler),
            init_tx,
        );
        let worker = tokio::spawn(dispatcher.run(events, shutdown.child_token()));

        let gate = AvailabilityGate::new(Arc::clone(&registry), Arc::clone(&provider));
        let service = Arc::new(Self {
            config,
            registry,
            provider,
            gate,
            bus,
            correlator,
            scheduler,
            initialized: init_rx,
            shutdown,
            worker: Mutex::new(Some(worker)),
        });

        if service.config.enable_ads {
            let init = Arc::clone(&service);
            tokio::spawn(async move { init.run_init_flow().await });
        } else {
            info!("ads disabled by configuration");
        }
        Ok(service)
    }

    async fn run_init_flow(&self) {
        if let Err(err) = self.provider.init(&self.config.app_key).await {
            warn!(%err, "ad provider initialization failed");
            return;
        }
        if !self.wait_initialized().await {
            return;
        }
        info!("ad provider ready");
        if self.config.validate_integration {
            self.provider.validate_integration();
        }
        self.scheduler.maybe_reload().await;
    }

    /// Show a rewarded placement by name and wait for its terminal outcome.
    pub async fn show_rewarded(&self, placement: &str) -> ShowOutcome {
        self.show_checked(placement, PlacementKind::Rewarded).await
    }

    /// Show an interstitial placement by name and wait for its terminal
    /// outcome.
    pub async fn show_interstitial(&self, placement: &str) -> ShowOutcome {
        self.show_checked(placement, PlacementKind::Interstitial)
            .await
    }

    /// Show the first available placement of `kind`, in registration order.
    pub async fn show_any(&self, kind: PlacementKind) -> ShowOutcome {
        let selected = self
            .registry
            .find_by_kind(kind, |descriptor| self.gate.is_available(&descriptor.name))
            .map(|descriptor| descriptor.name.clone());
        match selected {
            Some(name) => self.show_checked(&name, kind).await,
            None => ShowOutcome::failure("", kind, ShowError::PlacementNotFound),
        }
    }

    async fn show_checked(&self, placement: &str, kind: PlacementKind) -> ShowOutcome {
        if self.shutdown.is_cancelled() {
            return ShowOutcome::failure(placement, kind, ShowError::Cancelled);
        }
        if !self.config.enable_ads || !*self.initialized.borrow() {
            return ShowOutcome::failure(placement, kind, ShowError::ProviderUnavailable);
        }
        let known = self
            .registry
            .find(placement)
            .is_some_and(|descriptor| descriptor.enabled && descriptor.kind == kind);
        if !known {
            return ShowOutcome::failure(placement, kind, ShowError::PlacementNotFound);
        }
        if !self.gate.kind_loaded(kind) {
            return ShowOutcome::failure(placement, kind, ShowError::ProviderUnavailable);
        }
        if kind == PlacementKind::Rewarded && self.provider.is_placement_capped(placement) {
            return ShowOutcome::failure(placement, kind, ShowError::PlacementCapped);
        }

        let mut suspension = match self.correlator.begin(placement, kind).await {
            Ok(suspension) => suspension,
            Err(error) => return ShowOutcome::failure(placement, kind, error),
        };
        let _ = self
            .bus
            .publish(AdActionEvent::new(placement, kind, AdAction::Requested))
            .await;

        let shown = match kind {
            PlacementKind::Rewarded => self.provider.show_rewarded(placement).await,
            PlacementKind::Interstitial => self.provider.show_interstitial(placement).await,
        };
        if let Err(err) = shown {
            warn!(%err, placement, "provider rejected show request");
            let error = ShowError::ProviderShowFailed {
                code: None,
                message: err.to_string(),
            };
            if let Some(outcome) = self.correlator.fail(placement, kind, error).await {
                let _ = self.bus.publish_outcome(outcome.clone()).await;
                return outcome;
            }
        }

        let resolved = tokio::select! {
            resolved = &mut suspension => Some(resolved),
            _ = self.shutdown.cancelled() => None,
        };
        match resolved {
            Some(resolved) => resolved
                .unwrap_or_else(|_| ShowOutcome::failure(placement, kind, ShowError::Cancelled)),
            None => {
                // The dispatcher drains entries present at cancellation; an
                // entry inserted after that drain is resolved here instead.
                match self.correlator.fail(placement, kind, ShowError::Cancelled).await {
                    Some(outcome) => outcome,
                    None => suspension.await.unwrap_or_else(|_| {
                        ShowOutcome::failure(placement, kind, ShowError::Cancelled)
                    }),
                }
            }
        }
    }

    /// Whether a show request for `placement` could be issued right now.
    pub fn is_available(&self, placement: &str) -> bool {
        self.gate.is_available(placement)
    }

    pub fn rewarded_available(&self) -> bool {
        self.provider.is_rewarded_available()
    }

    pub fn interstitial_available(&self) -> bool {
        self.provider.is_interstitial_available()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdActionEvent> {
        self.bus.subscribe()
    }

    pub fn subscribe_outcomes(&self) -> broadcast::Receiver<ShowOutcome> {
        self.bus.subscribe_outcomes()
    }

    /// Filtered view of the action stream; see
    /// [`InProcAdEventBus::action_stream`].
    pub fn action_stream(
        &self,
        predicate: impl Fn(&AdActionEvent) -> bool + Send + 'static,
    ) -> impl Stream<Item = AdActionEvent> + Send {
        self.bus.action_stream(predicate)
    }

    /// Snapshot of recent outcomes, oldest first.
    pub async fn history(&self) -> Vec<ShowOutcome> {
        self.correlator.history().await
    }

    pub fn registry(&self) -> &PlacementRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AdsConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        *self.initialized.borrow()
    }

    /// Wait until the provider reports initialization. Returns false when
    /// the service shuts down first.
    pub async fn wait_initialized(&self) -> bool {
        let mut initialized = self.initialized.clone();
        tokio::select! {
            _ = self.shutdown.cancelled() => false,
            ready = initialized.wait_for(|ready| *ready) => ready.is_ok(),
        }
    }

    /// Ask the SDK to run its integration self-check.
    pub fn validate_integration(&self) {
        self.provider.validate_integration();
    }

    /// Forward a host pause/resume transition verbatim to the provider.
    pub fn notify_application_pause(&self, paused: bool) {
        self.provider.on_application_pause(paused);
    }

    /// Tear the pipeline down: outstanding requests resolve with a cancelled
    /// outcome and the dispatcher task exits. Idempotent.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let worker = self.worker.lock().await.take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }
        info!("ads service stopped");
    }
}
