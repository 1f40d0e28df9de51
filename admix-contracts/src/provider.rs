use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("SDK error: {0}")]
    Sdk(String),

    #[error("provider not initialized")]
    NotInitialized,
}

/// Outbound operations of the mediation SDK.
///
/// Show and load calls return as soon as the SDK accepted the operation;
/// their real effect arrives later as [`admix_model::ProviderEvent`]
/// callbacks on the channel handed to the integration at wiring time. The
/// availability queries are pure and must not block.
#[async_trait]
pub trait AdProvider: Send + Sync {
    async fn init(&self, app_key: &str) -> Result<(), ProviderError>;

    async fn show_rewarded(&self, placement: &str) -> Result<(), ProviderError>;

    async fn show_interstitial(&self, placement: &str) -> Result<(), ProviderError>;

    async fn load_rewarded(&self) -> Result<(), ProviderError>;

    async fn load_interstitial(&self) -> Result<(), ProviderError>;

    fn is_rewarded_available(&self) -> bool;

    fn is_interstitial_available(&self) -> bool;

    /// Frequency cap check; only meaningful for rewarded placements.
    fn is_placement_capped(&self, placement: &str) -> bool;

    /// Ask the SDK to run its integration self-check. Fire and forget.
    fn validate_integration(&self);

    /// Host pause/resume notification, forwarded verbatim to the SDK.
    fn on_application_pause(&self, paused: bool);
}
