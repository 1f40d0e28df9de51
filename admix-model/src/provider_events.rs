#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Raw inbound callback surface of the mediation SDK, one variant per
/// callback. These are normalized into [`crate::AdActionEvent`]s before they
/// reach any subscriber.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProviderEvent {
    SdkInitialized,

    RewardedAvailable {
        placement: String,
    },
    /// Global signal; the provider does not name a placement here.
    RewardedUnavailable,
    RewardedOpened {
        placement: String,
    },
    RewardedClosed {
        placement: String,
    },
    RewardedClicked {
        placement: String,
    },
    /// The user finished the video; `reward` names the configured payout.
    RewardedEarned {
        placement: String,
        reward: String,
    },
    RewardedShowFailed {
        placement: String,
        code: i32,
        message: String,
    },

    InterstitialReady {
        placement: String,
    },
    InterstitialLoadFailed {
        code: i32,
        message: String,
    },
    InterstitialOpened {
        placement: String,
    },
    InterstitialClicked {
        placement: String,
    },
    InterstitialShowSucceeded {
        placement: String,
    },
    InterstitialShowFailed {
        placement: String,
        code: i32,
        message: String,
    },
    InterstitialClosed {
        placement: String,
    },
}
