use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use admix_model::PlacementDescriptor;

use crate::error::Result;

/// Top-level service settings. Use these to tune how aggressively inventory
/// is reloaded and which placements the service manages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdsConfig {
    /// Application key handed to the provider SDK at initialization.
    pub app_key: String,
    /// Master switch. When false the service never touches the SDK and
    /// every show request resolves as provider-unavailable.
    pub enable_ads: bool,
    /// Minimum wall-clock gap between inventory reloads, in seconds.
    /// Reload triggers arriving inside the gap are deferred, not dropped.
    pub reload_interval_secs: u64,
    /// Run the SDK integration self-check once initialization completes.
    pub validate_integration: bool,
    /// Capacity of the action and outcome broadcast channels. Subscribers
    /// that fall further behind than this skip events rather than stall
    /// publication.
    pub event_capacity: usize,
    /// Placement set registered at startup; names must be unique.
    pub placements: Vec<PlacementDescriptor>,
}

impl Default for AdsConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            enable_ads: true,
            reload_interval_secs: 30,
            validate_integration: false,
            event_capacity: 256,
            placements: Vec::new(),
        }
    }
}

impl AdsConfig {
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load a configuration from a TOML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use admix_model::PlacementKind;

    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AdsConfig::default();
        assert!(config.enable_ads);
        assert_eq!(config.reload_interval(), Duration::from_secs(30));
        assert!(config.placements.is_empty());
    }

    #[test]
    fn parses_placement_tables() {
        let config = AdsConfig::from_toml_str(
            r#"
            app_key = "abc123"
            reload_interval_secs = 5
            validate_integration = true

            [[placements]]
            name = "rewarded_main"
            kind = "rewarded"

            [[placements]]
            name = "interstitial_main"
            kind = "interstitial"
            enabled = false
            "#,
        )
        .expect("parse");

        assert_eq!(config.app_key, "abc123");
        assert_eq!(config.reload_interval(), Duration::from_secs(5));
        assert!(config.validate_integration);
        assert_eq!(config.placements.len(), 2);
        assert_eq!(config.placements[0].kind, PlacementKind::Rewarded);
        assert!(config.placements[0].enabled);
        assert!(!config.placements[1].enabled);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "app_key = \"from-disk\"").expect("write");

        let config = AdsConfig::load(file.path()).expect("load");
        assert_eq!(config.app_key, "from-disk");
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(AdsConfig::from_toml_str("app_key = [").is_err());
    }
}
