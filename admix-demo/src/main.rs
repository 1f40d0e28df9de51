//! Console harness driving the Admix pipeline against a scripted provider.
//!
//! Mirrors a typical integration: wire the service, watch the action
//! stream, fire a rewarded and an interstitial request, then inspect the
//! outcome history.

mod scripted;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use admix_core::{AdsConfig, AdsService, PlacementDescriptor, PlacementKind};
use scripted::ScriptedProvider;

#[derive(Debug, Parser)]
#[command(name = "admix-demo", about = "Drive the Admix pipeline end to end")]
struct Args {
    /// Rewarded placement name to register and request.
    #[arg(long, default_value = "rewarded_main")]
    rewarded: String,

    /// Interstitial placement name to register and request.
    #[arg(long, default_value = "interstitial_main")]
    interstitial: String,

    /// Reload cooldown in seconds.
    #[arg(long, default_value_t = 3)]
    reload_interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = AdsConfig {
        app_key: "demo-app-key".to_owned(),
        reload_interval_secs: args.reload_interval_secs,
        validate_integration: true,
        placements: vec![
            PlacementDescriptor::new(&args.rewarded, PlacementKind::Rewarded),
            PlacementDescriptor::new(&args.interstitial, PlacementKind::Interstitial),
        ],
        ..AdsConfig::default()
    };

    let (callbacks, events) = mpsc::unbounded_channel();
    let provider = Arc::new(ScriptedProvider::new(callbacks));
    let service = AdsService::start(config, provider, events)?;

    let mut actions = service.subscribe();
    let watcher = tokio::spawn(async move {
        while let Ok(event) = actions.recv().await {
            info!(
                placement = %event.placement,
                kind = %event.kind,
                action = ?event.action,
                "action"
            );
        }
    });

    if !service.wait_initialized().await {
        anyhow::bail!("provider never initialized");
    }
    wait_until("rewarded inventory", || service.is_available(&args.rewarded)).await?;
    wait_until("interstitial inventory", || {
        service.is_available(&args.interstitial)
    })
    .await?;

    let outcome = service.show_rewarded(&args.rewarded).await;
    info!(
        placement = %outcome.placement,
        rewarded = outcome.rewarded,
        failed = outcome.failed(),
        message = %outcome.message(),
        "rewarded outcome"
    );

    let outcome = service.show_interstitial(&args.interstitial).await;
    info!(
        placement = %outcome.placement,
        failed = outcome.failed(),
        "interstitial outcome"
    );

    let outcome = service.show_any(PlacementKind::Rewarded).await;
    info!(
        placement = %outcome.placement,
        rewarded = outcome.rewarded,
        "show-any outcome"
    );

    for (index, record) in service.history().await.iter().enumerate() {
        info!(index, placement = %record.placement, rewarded = record.rewarded, failed = record.failed(), "history");
    }

    service.notify_application_pause(true);
    service.notify_application_pause(false);

    service.shutdown().await;
    watcher.abort();
    Ok(())
}

async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) -> Result<()> {
    for _ in 0..100 {
        if condition() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    anyhow::bail!("timed out waiting for {what}")
}
