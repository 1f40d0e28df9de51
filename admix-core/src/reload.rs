use std::{any::type_name_of_val, fmt, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use admix_contracts::AdProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReloadPhase {
    Idle,
    Scheduling,
    Reloading,
}

#[derive(Debug)]
struct CooldownState {
    phase: ReloadPhase,
    last_reload: Option<Instant>,
}

/// Cooldown-gated, single-flight refill of provider ad inventory.
///
/// `Idle -> Scheduling -> Reloading -> Idle`; a trigger arriving while the
/// scheduler is non-idle is a no-op, so bursts of unavailability events
/// collapse into one reload per cooldown window.
pub struct ReloadScheduler {
    provider: Arc<dyn AdProvider>,
    state: Mutex<CooldownState>,
    min_interval: Duration,
    shutdown: CancellationToken,
}

impl fmt::Debug for ReloadScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let provider_type = type_name_of_val(self.provider.as_ref());
        f.debug_struct("ReloadScheduler")
            .field("provider_type", &provider_type)
            .field("min_interval", &self.min_interval)
            .field("shutdown_cancelled", &self.shutdown.is_cancelled())
            .finish()
    }
}

impl ReloadScheduler {
    pub fn new(
        provider: Arc<dyn AdProvider>,
        min_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            provider,
            state: Mutex::new(CooldownState {
                phase: ReloadPhase::Idle,
                last_reload: None,
            }),
            min_interval,
            shutdown,
        }
    }

    /// Reload inventory for every ad kind, once the cooldown allows it.
    ///
    /// Returns true when this call performed the reload; false when another
    /// reload was already in flight, the wait was cancelled, or the provider
    /// rejected the load calls.
    pub async fn maybe_reload(&self) -> bool {
        let delay = {
            let mut state = self.state.lock().await;
            if state.phase != ReloadPhase::Idle {
                return false;
            }
            state.phase = ReloadPhase::Scheduling;
            match state.last_reload.map(|at| at.elapsed()) {
                Some(elapsed) if elapsed < self.min_interval => self.min_interval - elapsed,
                _ => Duration::ZERO,
            }
        };

        if !delay.is_zero() {
            debug!(?delay, "deferring inventory reload for cooldown");
        }
        tokio::select! {
            _ = self.shutdown.cancelled() => {
                self.reset().await;
                return false;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        self.state.lock().await.phase = ReloadPhase::Reloading;
        debug!("reloading ad inventory");

        let load = async {
            self.provider.load_rewarded().await?;
            self.provider.load_interstitial().await
        };
        tokio::select! {
            _ = self.shutdown.cancelled() => {
                self.reset().await;
                false
            }
            loaded = load => {
                let mut state = self.state.lock().await;
                state.phase = ReloadPhase::Idle;
                match loaded {
                    Ok(()) => {
                        state.last_reload = Some(Instant::now());
                        true
                    }
                    Err(err) => {
                        warn!(%err, "inventory reload failed");
                        false
                    }
                }
            }
        }
    }

    pub async fn is_idle(&self) -> bool {
        self.state.lock().await.phase == ReloadPhase::Idle
    }

    async fn reset(&self) {
        self.state.lock().await.phase = ReloadPhase::Idle;
    }
}
