use std::{any::type_name_of_val, fmt, sync::Arc};

use admix_contracts::AdProvider;
use admix_model::PlacementKind;

use crate::registry::PlacementRegistry;

/// Pure availability query combining registry metadata with live provider
/// state. No side effects, no blocking.
#[derive(Clone)]
pub struct AvailabilityGate {
    registry: Arc<PlacementRegistry>,
    provider: Arc<dyn AdProvider>,
}

impl fmt::Debug for AvailabilityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let provider_type = type_name_of_val(self.provider.as_ref());
        f.debug_struct("AvailabilityGate")
            .field("placements", &self.registry.len())
            .field("provider_type", &provider_type)
            .finish()
    }
}

impl AvailabilityGate {
    pub fn new(registry: Arc<PlacementRegistry>, provider: Arc<dyn AdProvider>) -> Self {
        Self { registry, provider }
    }

    /// Whether a show request for `name` could be issued right now.
    ///
    /// The placement must exist and be enabled, the provider must report the
    /// kind's inventory as loaded, and rewarded placements must not be
    /// frequency-capped.
    pub fn is_available(&self, name: &str) -> bool {
        let Some(descriptor) = self.registry.find(name) else {
            return false;
        };
        if !descriptor.enabled {
            return false;
        }
        match descriptor.kind {
            PlacementKind::Rewarded => {
                self.provider.is_rewarded_available() && !self.provider.is_placement_capped(name)
            }
            PlacementKind::Interstitial => self.provider.is_interstitial_available(),
        }
    }

    /// Whether the provider reports any loaded inventory for `kind`.
    pub fn kind_loaded(&self, kind: PlacementKind) -> bool {
        match kind {
            PlacementKind::Rewarded => self.provider.is_rewarded_available(),
            PlacementKind::Interstitial => self.provider.is_interstitial_available(),
        }
    }
}
