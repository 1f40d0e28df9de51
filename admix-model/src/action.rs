use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::placement::PlacementKind;

/// Lifecycle action reported for a placement.
///
/// `Closed` and `Failed` are terminal: they end a show request. Everything
/// else is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdAction {
    Requested,
    Available,
    Unavailable,
    Opened,
    Closed,
    Clicked,
    Rewarded,
    Failed,
}

impl AdAction {
    /// Whether this action ends a show request's lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, AdAction::Closed | AdAction::Failed)
    }
}

/// Normalized provider callback, published on the action stream.
///
/// Append-only stream item; never mutated after publication.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdActionEvent {
    pub id: Uuid,
    /// Placement name as reported by the provider; may be empty when the
    /// callback carries no ad unit (e.g. a global unavailability signal).
    pub placement: String,
    pub kind: PlacementKind,
    pub action: AdAction,
    pub message: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error_code: Option<i32>,
    pub emitted_at: DateTime<Utc>,
}

impl AdActionEvent {
    pub fn new(placement: impl Into<String>, kind: PlacementKind, action: AdAction) -> Self {
        Self {
            id: Uuid::now_v7(),
            placement: placement.into(),
            kind,
            action,
            message: String::new(),
            error_code: None,
            emitted_at: Utc::now(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_error_code(mut self, code: i32) -> Self {
        self.error_code = Some(code);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.action.is_terminal()
    }
}
