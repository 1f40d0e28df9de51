//! Shared fixtures for admix-core integration tests.
#![allow(dead_code)]

pub mod fake_provider;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use admix_core::{AdsConfig, AdsService, PlacementDescriptor, PlacementKind};

use self::fake_provider::FakeProvider;

pub fn default_placements() -> Vec<PlacementDescriptor> {
    vec![
        PlacementDescriptor::new("rewarded_main", PlacementKind::Rewarded),
        PlacementDescriptor::new("rewarded_bonus", PlacementKind::Rewarded),
        PlacementDescriptor::new("interstitial_main", PlacementKind::Interstitial),
    ]
}

pub fn test_config(placements: Vec<PlacementDescriptor>) -> AdsConfig {
    AdsConfig {
        app_key: "test-key".to_owned(),
        reload_interval_secs: 0,
        placements,
        ..AdsConfig::default()
    }
}

/// Start a service over a fresh [`FakeProvider`] and wait for the init flow
/// to complete.
pub async fn start_service(
    placements: Vec<PlacementDescriptor>,
) -> (Arc<AdsService>, Arc<FakeProvider>) {
    let (service, provider) = start_service_with(test_config(placements)).await;
    assert!(service.wait_initialized().await, "provider init");
    (service, provider)
}

pub async fn start_service_with(config: AdsConfig) -> (Arc<AdsService>, Arc<FakeProvider>) {
    let (callbacks, events) = mpsc::unbounded_channel();
    let provider = Arc::new(FakeProvider::new(callbacks));
    let service =
        AdsService::start(config, Arc::clone(&provider) as _, events).expect("service start");
    (service, provider)
}

/// Start a service whose provider accepts `init` but never confirms it.
pub async fn start_uninitialized_service(
    config: AdsConfig,
) -> (Arc<AdsService>, Arc<FakeProvider>) {
    let (callbacks, events) = mpsc::unbounded_channel();
    let provider = Arc::new(FakeProvider::new(callbacks));
    provider.manual_init();
    let service =
        AdsService::start(config, Arc::clone(&provider) as _, events).expect("service start");
    (service, provider)
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
