use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::placement::PlacementKind;

/// Why a show request terminated without a normal close.
///
/// Carried inside [`ShowOutcome`]; never returned as `Err` across the show
/// boundary, so callers always receive a terminal record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShowError {
    #[error("no matching placement")]
    PlacementNotFound,

    #[error("a request for this placement is already in flight")]
    AlreadyPending,

    #[error("provider inventory is not loaded")]
    ProviderUnavailable,

    #[error("placement frequency cap reached")]
    PlacementCapped,

    #[error("provider failed to show: {message}")]
    ProviderShowFailed { code: Option<i32>, message: String },

    #[error("request cancelled by service shutdown")]
    Cancelled,
}

impl ShowError {
    /// Provider error code, when the provider reported one.
    pub fn code(&self) -> Option<i32> {
        match self {
            ShowError::ProviderShowFailed { code, .. } => *code,
            _ => None,
        }
    }
}

/// Terminal record of one show request.
///
/// Created exactly once per resolved request; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShowOutcome {
    pub placement: String,
    pub kind: PlacementKind,
    /// True only when a `Rewarded` callback preceded the terminal close.
    pub rewarded: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<ShowError>,
}

impl ShowOutcome {
    pub fn completed(placement: impl Into<String>, kind: PlacementKind, rewarded: bool) -> Self {
        Self {
            placement: placement.into(),
            kind,
            rewarded,
            error: None,
        }
    }

    pub fn failure(placement: impl Into<String>, kind: PlacementKind, error: ShowError) -> Self {
        Self {
            placement: placement.into(),
            kind,
            rewarded: false,
            error: Some(error),
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn message(&self) -> String {
        self.error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn error_code(&self) -> Option<i32> {
        self.error.as_ref().and_then(ShowError::code)
    }
}
