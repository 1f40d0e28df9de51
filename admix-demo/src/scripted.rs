//! A provider double that plays back a plausible SDK conversation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use admix_core::{AdProvider, ProviderError, ProviderEvent};

const CALLBACK_LATENCY: Duration = Duration::from_millis(150);

/// Simulated mediation SDK: every operation succeeds, and callbacks arrive
/// on the event channel after a short latency, the way a real SDK delivers
/// them from its own thread.
#[derive(Debug)]
pub struct ScriptedProvider {
    events: mpsc::UnboundedSender<ProviderEvent>,
    rewarded_loaded: AtomicBool,
    interstitial_loaded: AtomicBool,
}

impl ScriptedProvider {
    pub fn new(events: mpsc::UnboundedSender<ProviderEvent>) -> Self {
        Self {
            events,
            rewarded_loaded: AtomicBool::new(false),
            interstitial_loaded: AtomicBool::new(false),
        }
    }

    fn emit_later(&self, script: Vec<ProviderEvent>) {
        let events = self.events.clone();
        tokio::spawn(async move {
            for event in script {
                tokio::time::sleep(CALLBACK_LATENCY).await;
                if events.send(event).is_err() {
                    break;
                }
            }
        });
    }
}

#[async_trait]
impl AdProvider for ScriptedProvider {
    async fn init(&self, app_key: &str) -> Result<(), ProviderError> {
        info!(app_key, "sdk init requested");
        self.emit_later(vec![ProviderEvent::SdkInitialized]);
        Ok(())
    }

    async fn show_rewarded(&self, placement: &str) -> Result<(), ProviderError> {
        if !self.rewarded_loaded.load(Ordering::SeqCst) {
            return Err(ProviderError::NotInitialized);
        }
        self.emit_later(vec![
            ProviderEvent::RewardedOpened {
                placement: placement.to_owned(),
            },
            ProviderEvent::RewardedEarned {
                placement: placement.to_owned(),
                reward: "coins".to_owned(),
            },
            ProviderEvent::RewardedClosed {
                placement: placement.to_owned(),
            },
        ]);
        Ok(())
    }

    async fn show_interstitial(&self, placement: &str) -> Result<(), ProviderError> {
        if !self.interstitial_loaded.load(Ordering::SeqCst) {
            return Err(ProviderError::NotInitialized);
        }
        self.emit_later(vec![
            ProviderEvent::InterstitialOpened {
                placement: placement.to_owned(),
            },
            ProviderEvent::InterstitialClosed {
                placement: placement.to_owned(),
            },
        ]);
        Ok(())
    }

    async fn load_rewarded(&self) -> Result<(), ProviderError> {
        self.rewarded_loaded.store(true, Ordering::SeqCst);
        self.emit_later(vec![ProviderEvent::RewardedAvailable {
            placement: String::new(),
        }]);
        Ok(())
    }

    async fn load_interstitial(&self) -> Result<(), ProviderError> {
        self.interstitial_loaded.store(true, Ordering::SeqCst);
        self.emit_later(vec![ProviderEvent::InterstitialReady {
            placement: String::new(),
        }]);
        Ok(())
    }

    fn is_rewarded_available(&self) -> bool {
        self.rewarded_loaded.load(Ordering::SeqCst)
    }

    fn is_interstitial_available(&self) -> bool {
        self.interstitial_loaded.load(Ordering::SeqCst)
    }

    fn is_placement_capped(&self, _placement: &str) -> bool {
        false
    }

    fn validate_integration(&self) {
        info!("integration validated");
    }

    fn on_application_pause(&self, paused: bool) {
        info!(paused, "application pause forwarded");
    }
}
