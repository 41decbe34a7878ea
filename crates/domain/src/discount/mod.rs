//! The discount record and the rules evaluated against it.

mod calculation;
mod status;
mod value_objects;

pub use calculation::DiscountCalculation;
pub use status::DiscountStatus;
pub use value_objects::{DiscountCode, DiscountKind};

use chrono::{DateTime, Utc};
use common::Money;
use serde::{Deserialize, Serialize};

/// A validated discount as served by the booking backend.
///
/// The same shape is used on the wire and in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub code: DiscountCode,

    #[serde(rename = "type")]
    pub kind: DiscountKind,

    /// Whole percent for [`DiscountKind::Percentage`], cents for
    /// [`DiscountKind::FixedAmount`].
    pub amount: i64,

    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,

    /// Usage cap. `None` and `Some(0)` both mean uncapped.
    #[serde(default)]
    pub max_uses: Option<u32>,

    #[serde(default)]
    pub current_uses: u32,

    #[serde(default)]
    pub status: DiscountStatus,
}

impl Discount {
    /// Creates an active, uncapped percentage discount.
    pub fn percentage(code: impl Into<DiscountCode>, percent: i64) -> Self {
        Self::new(code.into(), DiscountKind::Percentage, percent)
    }

    /// Creates an active, uncapped fixed-amount discount of `cents`.
    pub fn fixed(code: impl Into<DiscountCode>, cents: i64) -> Self {
        Self::new(code.into(), DiscountKind::FixedAmount, cents)
    }

    fn new(code: DiscountCode, kind: DiscountKind, amount: i64) -> Self {
        Self {
            code,
            kind,
            amount,
            valid_until: None,
            max_uses: None,
            current_uses: 0,
            status: DiscountStatus::Active,
        }
    }

    pub fn with_valid_until(mut self, valid_until: DateTime<Utc>) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    pub fn with_usage(mut self, max_uses: u32, current_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self.current_uses = current_uses;
        self
    }

    pub fn with_status(mut self, status: DiscountStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if the validity window ended strictly before `now`.
    pub fn is_past_validity(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }

    /// Returns true if the discount can no longer be used at `now`.
    ///
    /// Either an `INACTIVE`/`EXPIRED` status or a past validity end is
    /// sufficient on its own.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.status.is_unusable() || self.is_past_validity(now)
    }

    /// [`Discount::is_expired_at`] evaluated against the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the cap if one is set and non-zero.
    pub fn usage_cap(&self) -> Option<u32> {
        self.max_uses.filter(|cap| *cap > 0)
    }

    /// Returns true if a usage cap exists and has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_cap()
            .is_some_and(|cap| self.current_uses >= cap)
    }

    /// Remaining redemptions, or `None` when uncapped.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.usage_cap()
            .map(|cap| cap.saturating_sub(self.current_uses))
    }

    pub fn is_single_use(&self) -> bool {
        self.usage_cap() == Some(1)
    }

    /// The nominal percentage, or 0 for fixed-amount discounts.
    pub fn effective_percentage(&self) -> i64 {
        match self.kind {
            DiscountKind::Percentage => self.amount,
            DiscountKind::FixedAmount => 0,
        }
    }

    /// Applies this discount to `price`.
    pub fn calculate(&self, price: Money) -> DiscountCalculation {
        DiscountCalculation::for_discount(self, price)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_status_alone_expires() {
        let now = Utc::now();
        let future = now + Duration::days(30);
        for status in [DiscountStatus::Inactive, DiscountStatus::Expired] {
            let discount = Discount::percentage("X", 10)
                .with_status(status)
                .with_valid_until(future);
            assert!(discount.is_expired_at(now));
        }
    }

    #[test]
    fn test_past_validity_alone_expires() {
        let now = Utc::now();
        let discount =
            Discount::percentage("X", 10).with_valid_until(now - Duration::seconds(1));
        assert_eq!(discount.status, DiscountStatus::Active);
        assert!(discount.is_expired_at(now));
    }

    #[test]
    fn test_validity_end_equal_to_now_is_not_expired() {
        let now = Utc::now();
        let discount = Discount::percentage("X", 10).with_valid_until(now);
        assert!(!discount.is_expired_at(now));
    }

    #[test]
    fn test_no_validity_end_never_expires_by_time() {
        let discount = Discount::fixed("X", 500);
        assert!(!discount.is_expired());
    }

    #[test]
    fn test_remaining_uses() {
        assert_eq!(Discount::fixed("X", 1).remaining_uses(), None);
        assert_eq!(Discount::fixed("X", 1).with_usage(10, 3).remaining_uses(), Some(7));
        assert_eq!(Discount::fixed("X", 1).with_usage(10, 12).remaining_uses(), Some(0));
        assert_eq!(Discount::fixed("X", 1).with_usage(0, 5).remaining_uses(), None);
    }

    #[test]
    fn test_exhausted_and_single_use() {
        assert!(Discount::fixed("X", 1).with_usage(100, 100).is_exhausted());
        assert!(!Discount::fixed("X", 1).with_usage(100, 99).is_exhausted());
        assert!(!Discount::fixed("X", 1).with_usage(0, 99).is_exhausted());
        assert!(Discount::fixed("X", 1).with_usage(1, 0).is_single_use());
        assert!(!Discount::fixed("X", 1).with_usage(2, 0).is_single_use());
    }

    #[test]
    fn test_effective_percentage() {
        assert_eq!(Discount::percentage("X", 25).effective_percentage(), 25);
        assert_eq!(Discount::fixed("X", 2500).effective_percentage(), 0);
    }

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "code": "summer20",
            "type": "PERCENTAGE",
            "amount": 20,
            "validUntil": "2030-06-30T23:59:59Z",
            "maxUses": 100,
            "currentUses": 4,
            "status": "ACTIVE"
        }"#;
        let discount: Discount = serde_json::from_str(json).unwrap();
        assert_eq!(discount.code.as_str(), "SUMMER20");
        assert_eq!(discount.kind, DiscountKind::Percentage);
        assert_eq!(discount.max_uses, Some(100));
        assert_eq!(discount.remaining_uses(), Some(96));
        assert!(discount.valid_until.is_some());
    }

    #[test]
    fn test_deserialize_minimal_shape() {
        let json = r#"{"code":"TEN","type":"FIXED_AMOUNT","amount":1000,"validUntil":null,"maxUses":null}"#;
        let discount: Discount = serde_json::from_str(json).unwrap();
        assert_eq!(discount, Discount::fixed("TEN", 1000));
    }

    #[test]
    fn test_serialization_roundtrip_keeps_timestamp() {
        let discount = Discount::percentage("X", 5)
            .with_valid_until(Utc::now())
            .with_usage(3, 1);
        let json = serde_json::to_string(&discount).unwrap();
        assert!(json.contains("\"validUntil\""));
        let decoded: Discount = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, discount);
    }
}
