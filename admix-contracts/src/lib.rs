//! Trait surfaces that describe interactions with external ad providers.

pub mod provider;

/// Frequently used contract types for engine and integration crates.
pub mod prelude {
    pub use super::provider::{AdProvider, ProviderError};
    pub use admix_model::prelude::*;
}

pub use provider::{AdProvider, ProviderError};
