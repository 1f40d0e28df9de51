use std::collections::HashMap;

use admix_model::{PlacementDescriptor, PlacementKind};

use crate::error::{AdsError, Result};

/// Ordered set of placement descriptors, loaded once at startup.
///
/// Registration order is significant: [`PlacementRegistry::find_by_kind`]
/// returns the first match, so earlier placements win ties.
#[derive(Debug, Default)]
pub struct PlacementRegistry {
    slots: Vec<PlacementDescriptor>,
    by_name: HashMap<String, usize>,
}

impl PlacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = PlacementDescriptor>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: PlacementDescriptor) -> Result<()> {
        if self.by_name.contains_key(&descriptor.name) {
            return Err(AdsError::DuplicatePlacement(descriptor.name));
        }
        self.by_name
            .insert(descriptor.name.clone(), self.slots.len());
        self.slots.push(descriptor);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&PlacementDescriptor> {
        self.by_name.get(name).map(|index| &self.slots[*index])
    }

    /// First enabled descriptor of `kind` satisfying `predicate`, in
    /// registration order.
    pub fn find_by_kind(
        &self,
        kind: PlacementKind,
        predicate: impl Fn(&PlacementDescriptor) -> bool,
    ) -> Option<&PlacementDescriptor> {
        self.slots
            .iter()
            .filter(|descriptor| descriptor.enabled && descriptor.kind == kind)
            .find(|descriptor| predicate(descriptor))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacementDescriptor> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
