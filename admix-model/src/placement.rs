use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of ad slot a placement serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlacementKind {
    /// Opt-in video the user watches in exchange for an in-game reward.
    Rewarded,
    /// Full-screen ad shown between content transitions.
    Interstitial,
}

impl fmt::Display for PlacementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementKind::Rewarded => write!(f, "rewarded"),
            PlacementKind::Interstitial => write!(f, "interstitial"),
        }
    }
}

/// A named ad slot configured in the mediation provider.
///
/// Descriptors are loaded once at startup and never change afterwards.
/// Disabled placements stay registered for diagnostics but are never
/// selected or reported available.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementDescriptor {
    /// Unique placement name, the correlation key for the whole pipeline.
    pub name: String,
    pub kind: PlacementKind,
    #[cfg_attr(feature = "serde", serde(default = "enabled_default"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
fn enabled_default() -> bool {
    true
}

impl PlacementDescriptor {
    pub fn new(name: impl Into<String>, kind: PlacementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enabled: true,
        }
    }

    pub fn disabled(name: impl Into<String>, kind: PlacementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            enabled: false,
        }
    }
}

impl fmt::Display for PlacementDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
