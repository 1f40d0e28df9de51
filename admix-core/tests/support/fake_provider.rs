use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use admix_core::{AdProvider, ProviderError, ProviderEvent};

/// One recorded outbound SDK call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Init(String),
    ShowRewarded(String),
    ShowInterstitial(String),
    LoadRewarded,
    LoadInterstitial,
    ValidateIntegration,
    Pause(bool),
}

/// Recording provider double. Tests script inbound callbacks through
/// [`FakeProvider::emit`] and assert on the recorded outbound calls.
#[derive(Debug)]
pub struct FakeProvider {
    events: mpsc::UnboundedSender<ProviderEvent>,
    calls: Mutex<Vec<ProviderCall>>,
    auto_init: AtomicBool,
    rewarded_available: AtomicBool,
    interstitial_available: AtomicBool,
    capped: Mutex<HashSet<String>>,
    reject_shows: AtomicBool,
}

impl FakeProvider {
    pub fn new(events: mpsc::UnboundedSender<ProviderEvent>) -> Self {
        Self {
            events,
            calls: Mutex::new(Vec::new()),
            auto_init: AtomicBool::new(true),
            rewarded_available: AtomicBool::new(true),
            interstitial_available: AtomicBool::new(true),
            capped: Mutex::new(HashSet::new()),
            reject_shows: AtomicBool::new(false),
        }
    }

    /// Deliver a raw SDK callback to the service under test.
    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &ProviderCall) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|recorded| *recorded == call)
            .count()
    }

    pub fn load_pairs(&self) -> usize {
        self.count(&ProviderCall::LoadRewarded)
    }

    /// Suppress the automatic `SdkInitialized` reply to `init`.
    pub fn manual_init(&self) {
        self.auto_init.store(false, Ordering::SeqCst);
    }

    pub fn set_rewarded_available(&self, available: bool) {
        self.rewarded_available.store(available, Ordering::SeqCst);
    }

    pub fn set_interstitial_available(&self, available: bool) {
        self.interstitial_available
            .store(available, Ordering::SeqCst);
    }

    pub fn cap(&self, placement: &str) {
        self.capped.lock().unwrap().insert(placement.to_owned());
    }

    pub fn set_reject_shows(&self, reject: bool) {
        self.reject_shows.store(reject, Ordering::SeqCst);
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AdProvider for FakeProvider {
    async fn init(&self, app_key: &str) -> Result<(), ProviderError> {
        self.record(ProviderCall::Init(app_key.to_owned()));
        if self.auto_init.load(Ordering::SeqCst) {
            self.emit(ProviderEvent::SdkInitialized);
        }
        Ok(())
    }

    async fn show_rewarded(&self, placement: &str) -> Result<(), ProviderError> {
        self.record(ProviderCall::ShowRewarded(placement.to_owned()));
        if self.reject_shows.load(Ordering::SeqCst) {
            return Err(ProviderError::Sdk("show rejected".to_owned()));
        }
        Ok(())
    }

    async fn show_interstitial(&self, placement: &str) -> Result<(), ProviderError> {
        self.record(ProviderCall::ShowInterstitial(placement.to_owned()));
        if self.reject_shows.load(Ordering::SeqCst) {
            return Err(ProviderError::Sdk("show rejected".to_owned()));
        }
        Ok(())
    }

    async fn load_rewarded(&self) -> Result<(), ProviderError> {
        self.record(ProviderCall::LoadRewarded);
        Ok(())
    }

    async fn load_interstitial(&self) -> Result<(), ProviderError> {
        self.record(ProviderCall::LoadInterstitial);
        Ok(())
    }

    fn is_rewarded_available(&self) -> bool {
        self.rewarded_available.load(Ordering::SeqCst)
    }

    fn is_interstitial_available(&self) -> bool {
        self.interstitial_available.load(Ordering::SeqCst)
    }

    fn is_placement_capped(&self, placement: &str) -> bool {
        self.capped.lock().unwrap().contains(placement)
    }

    fn validate_integration(&self) {
        self.record(ProviderCall::ValidateIntegration);
    }

    fn on_application_pause(&self, paused: bool) {
        self.record(ProviderCall::Pause(paused));
    }
}
