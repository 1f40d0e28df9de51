//! # Admix Core
//!
//! Core engine for the Admix ad-mediation layer: a single-flight, event
//! driven correlation pipeline between show requests and the asynchronous
//! callbacks of an external mediation SDK.
//!
//! ## Overview
//!
//! `admix-core` provides:
//!
//! - **Placement Registry**: ordered, immutable-after-load placement
//!   metadata with first-match selection per ad kind
//! - **Availability Gating**: pure queries combining registry state with
//!   live provider inventory and frequency caps
//! - **Request Correlation**: at most one in-flight show request per
//!   placement, suspended until a terminal provider event resolves it
//! - **Event Bus**: in-process broadcast of normalized action events and
//!   show outcomes, with filtered stream views
//! - **Reload Scheduling**: cooldown-gated, single-flight inventory refills
//!   triggered by unavailability and failure events
//!
//! ## Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`registry`]: placement descriptors and selection order
//! - [`availability`]: the availability gate
//! - [`correlation`]: the pending-request correlator
//! - [`reload`]: the cooldown-gated reload scheduler
//! - [`runtime`]: event bus, callback dispatcher, and the [`AdsService`]
//!   facade that wires everything together
//!
//! ## Examples
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use admix_core::{AdsConfig, AdsService};
//! use tokio::sync::mpsc;
//!
//! let config = AdsConfig::load("admix.toml")?;
//! let (callbacks, events) = mpsc::unbounded_channel();
//! let provider = Arc::new(LevelPlaySdk::attach(callbacks));
//!
//! let ads = AdsService::start(config, provider, events)?;
//! let outcome = ads.show_rewarded("rewarded_main").await;
//! if outcome.rewarded {
//!     grant_reward();
//! }
//! ```

pub mod availability;
pub mod config;
pub mod correlation;
pub mod error;
pub mod registry;
pub mod reload;
pub mod runtime;

pub use availability::AvailabilityGate;
pub use config::AdsConfig;
pub use correlation::RequestCorrelator;
pub use error::{AdsError, Result};
pub use registry::PlacementRegistry;
pub use reload::ReloadScheduler;
pub use runtime::event_bus::{
    AdEventPublisher, AdEventStream, InProcAdEventBus, OutcomePublisher, OutcomeStream,
};
pub use runtime::service::AdsService;

pub use admix_contracts::{AdProvider, ProviderError};
pub use admix_model::{
    AdAction, AdActionEvent, PlacementDescriptor, PlacementKind, ProviderEvent, ShowError,
    ShowOutcome,
};
