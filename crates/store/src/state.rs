//! Discount UI state and its validation status.

use domain::{Discount, DiscountCode, ErrorCategory};
use serde::{Deserialize, Serialize};

/// Where the entered code is in its validation lifecycle.
///
/// State transitions:
/// ```text
/// Idle ──► Validating ──┬──► Valid ──► Idle (editing)
///                       └──► Error ──► Idle (editing)
/// ```
/// `clear` returns to `Idle` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Nothing submitted, or the user is editing.
    #[default]
    Idle,

    /// A validation request is in flight.
    Validating,

    /// The last submitted code was accepted.
    Valid,

    /// The last submitted code was rejected.
    Error,
}

impl ValidationStatus {
    /// Returns true if a new validation may be started.
    ///
    /// The store itself does not enforce this; [`crate::CheckoutSession`] does.
    pub fn can_submit(&self) -> bool {
        !matches!(self, ValidationStatus::Validating)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Idle => "idle",
            ValidationStatus::Validating => "validating",
            ValidationStatus::Valid => "valid",
            ValidationStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The full discount state of one session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountState {
    /// Candidate code as typed, normalized.
    pub code: DiscountCode,
    pub status: ValidationStatus,
    /// The one discount currently applied, if any. Persisted.
    pub applied_discount: Option<Discount>,
    pub error: Option<ErrorCategory>,
}
