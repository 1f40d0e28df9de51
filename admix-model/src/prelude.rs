//! Snapshot of the model surface for engine and presentation layers.
//! Prefer importing from this module instead of individual tree nodes.

pub use super::action::{AdAction, AdActionEvent};
pub use super::outcome::{ShowError, ShowOutcome};
pub use super::placement::{PlacementDescriptor, PlacementKind};
pub use super::provider_events::ProviderEvent;
