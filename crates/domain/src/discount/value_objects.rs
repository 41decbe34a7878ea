//! Value objects for the discount domain.

use serde::{Deserialize, Serialize};

/// A discount code in canonical form (trimmed, uppercase).
///
/// Every way of constructing a `DiscountCode`, including deserialization,
/// goes through [`DiscountCode::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DiscountCode(String);

impl DiscountCode {
    /// Normalizes raw user input into a discount code.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing remains after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for DiscountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DiscountCode {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}

impl From<&str> for DiscountCode {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<DiscountCode> for String {
    fn from(code: DiscountCode) -> Self {
        code.0
    }
}

impl AsRef<str> for DiscountCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// How a discount's `amount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// `amount` is a whole percentage of the price.
    #[serde(alias = "percentage")]
    Percentage,

    /// `amount` is a fixed number of cents.
    #[serde(alias = "fixed_amount", alias = "fixed")]
    FixedAmount,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percentage => "PERCENTAGE",
            DiscountKind::FixedAmount => "FIXED_AMOUNT",
        }
    }
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
