//! Discount lifecycle status as reported by the backend.

use serde::{Deserialize, Serialize};

/// The status flag carried on a discount record.
///
/// The backend owns these transitions; clients only read them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountStatus {
    /// Discount can be redeemed.
    #[default]
    #[serde(alias = "active")]
    Active,

    /// Discount was switched off by an operator.
    #[serde(alias = "inactive")]
    Inactive,

    /// Discount campaign has ended.
    #[serde(alias = "expired")]
    Expired,
}

impl DiscountStatus {
    /// Returns true if the status alone rules out redemption.
    pub fn is_unusable(&self) -> bool {
        matches!(self, DiscountStatus::Inactive | DiscountStatus::Expired)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountStatus::Active => "ACTIVE",
            DiscountStatus::Inactive => "INACTIVE",
            DiscountStatus::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for DiscountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
