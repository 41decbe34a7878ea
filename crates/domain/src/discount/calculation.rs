//! Checkout amounts derived from a discount and a price.

use common::Money;
use serde::{Deserialize, Serialize};

use super::{Discount, DiscountKind};

/// Result of applying a discount to a price.
///
/// Invariants: `final_price == original_price - discount_amount` and
/// `0 <= discount_amount <= original_price` for non-negative prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCalculation {
    pub original_price: Money,
    pub discount_amount: Money,
    pub final_price: Money,
    /// Discount as a share of the original price, two decimals.
    pub effective_percentage: f64,
}

impl DiscountCalculation {
    /// A calculation with no discount applied.
    pub fn none(price: Money) -> Self {
        Self {
            original_price: price,
            discount_amount: Money::zero(),
            final_price: price,
            effective_percentage: 0.0,
        }
    }

    /// Applies `discount` to `price`.
    pub fn for_discount(discount: &Discount, price: Money) -> Self {
        if price.cents() <= 0 || discount.amount <= 0 {
            return Self::none(price);
        }

        let raw = match discount.kind {
            DiscountKind::Percentage => Money::from_cents(div_round_half_away(
                i128::from(price.cents()) * i128::from(discount.amount),
                100,
            )),
            DiscountKind::FixedAmount => Money::from_cents(discount.amount),
        };
        let discount_amount = raw.min(price);

        Self::from_amounts(price, discount_amount)
    }

    /// Builds a calculation from a price and an already-known discount amount.
    ///
    /// The amount is clamped into `[0, price]`.
    pub fn from_amounts(price: Money, discount_amount: Money) -> Self {
        if price.cents() <= 0 {
            return Self::none(price);
        }
        let discount_amount = Money::from_cents(discount_amount.cents().clamp(0, price.cents()));
        let basis_points = div_round_half_away(
            i128::from(discount_amount.cents()) * 10_000,
            i128::from(price.cents()),
        );

        Self {
            original_price: price,
            discount_amount,
            final_price: price - discount_amount,
            effective_percentage: basis_points as f64 / 100.0,
        }
    }
}

/// Integer division rounding half away from zero.
fn div_round_half_away(numerator: i128, denominator: i128) -> i64 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let rounded = if 2 * remainder.abs() >= denominator.abs() {
        quotient + numerator.signum() * denominator.signum()
    } else {
        quotient
    };
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(cents: i64) -> Money {
        Money::from_cents(cents)
    }

    #[test]
    fn test_percentage_discount() {
        let calc = Discount::percentage("SUMMER20", 20).calculate(price(5000));
        assert_eq!(calc.discount_amount, price(1000));
        assert_eq!(calc.final_price, price(4000));
        assert_eq!(calc.effective_percentage, 20.0);
    }

    #[test]
    fn test_oversized_percentage_takes_whole_price() {
        let calc = Discount::percentage("HUGE", i64::MAX).calculate(price(5000));
        assert_eq!(calc.discount_amount, price(5000));
        assert_eq!(calc.final_price, price(0));
        assert_eq!(calc.effective_percentage, 100.0);
    }

    #[test]
    fn test_percentage_rounds_half_away_from_zero() {
        // 15% of 1250 = 187.5
        let calc = Discount::percentage("P15", 15).calculate(price(1250));
        assert_eq!(calc.discount_amount, price(188));
        assert_eq!(calc.final_price, price(1062));

        // 15% of 1230 = 184.5
        let calc = Discount::percentage("P15", 15).calculate(price(1230));
        assert_eq!(calc.discount_amount, price(185));

        // 15% of 1231 = 184.65
        let calc = Discount::percentage("P15", 15).calculate(price(1231));
        assert_eq!(calc.discount_amount, price(185));

        // 15% of 1221 = 183.15
        let calc = Discount::percentage("P15", 15).calculate(price(1221));
        assert_eq!(calc.discount_amount, price(183));
    }

    #[test]
    fn test_percentage_above_hundred_is_capped_at_price() {
        let calc = Discount::percentage("ALL", 150).calculate(price(999));
        assert_eq!(calc.discount_amount, price(999));
        assert_eq!(calc.final_price, Money::zero());
        assert_eq!(calc.effective_percentage, 100.0);
    }

    #[test]
    fn test_fixed_discount() {
        let calc = Discount::fixed("TENOFF", 1000).calculate(price(4500));
        assert_eq!(calc.discount_amount, price(1000));
        assert_eq!(calc.final_price, price(3500));
        assert_eq!(calc.effective_percentage, 22.22);
    }

    #[test]
    fn test_fixed_discount_larger_than_price() {
        let calc = Discount::fixed("BIG", 10_000).calculate(price(2500));
        assert_eq!(calc.discount_amount, price(2500));
        assert_eq!(calc.final_price, Money::zero());
    }

    #[test]
    fn test_zero_price() {
        let calc = Discount::percentage("P10", 10).calculate(Money::zero());
        assert_eq!(calc, DiscountCalculation::none(Money::zero()));
    }

    #[test]
    fn test_non_positive_amount_gives_no_discount() {
        let calc = Discount::fixed("NEG", -500).calculate(price(1000));
        assert_eq!(calc.discount_amount, Money::zero());
        assert_eq!(calc.final_price, price(1000));
    }

    #[test]
    fn test_final_plus_discount_equals_price() {
        let discounts = [
            Discount::percentage("P7", 7),
            Discount::percentage("P33", 33),
            Discount::percentage("P99", 99),
            Discount::fixed("F1", 1),
            Discount::fixed("F777", 777),
        ];
        for cents in [1, 3, 99, 101, 1234, 9999, 123_457] {
            for discount in &discounts {
                let calc = discount.calculate(price(cents));
                assert_eq!(calc.final_price + calc.discount_amount, price(cents));
                assert!(calc.discount_amount <= price(cents));
                assert!(!calc.discount_amount.is_negative());
            }
        }
    }

    #[test]
    fn test_from_amounts_clamps() {
        let calc = DiscountCalculation::from_amounts(price(1000), price(1500));
        assert_eq!(calc.discount_amount, price(1000));
        let calc = DiscountCalculation::from_amounts(price(1000), price(-5));
        assert_eq!(calc.discount_amount, Money::zero());
    }

    #[test]
    fn test_div_round_half_away_negative() {
        assert_eq!(div_round_half_away(-15, 10), -2);
        assert_eq!(div_round_half_away(-14, 10), -1);
        assert_eq!(div_round_half_away(15, 10), 2);
        assert_eq!(div_round_half_away(14, 10), 1);
    }
}
