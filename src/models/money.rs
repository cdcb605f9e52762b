//! Monetary value type.
//!
//! [`Money`] wraps a [`Decimal`] so that no amount on a receipt ever passes
//! through binary floating point. Ratio-based scaling rounds to
//! [`Money::INTERNAL_SCALE`] places; presentation rounds to two.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An exact decimal amount of currency.
///
/// # Example
///
/// ```
/// use receipt_engine::models::Money;
///
/// let subtotal: Money = "60.50".parse().unwrap();
/// let tip: Money = "3.50".parse().unwrap();
/// assert_eq!((subtotal + tip).to_string(), "64.00");
/// assert!(subtotal.approx_eq("60.55".parse().unwrap(), "0.10".parse().unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Decimal places kept by ratio-based arithmetic.
    pub const INTERNAL_SCALE: u32 = 6;

    /// Decimal places used when an amount is displayed or serialized.
    pub const PRESENTATION_SCALE: u32 = 2;

    /// Largest magnitude accepted from untrusted input (10^12).
    ///
    /// Sums and products of amounts within this bound stay far inside
    /// `Decimal`'s range, so arithmetic on them cannot overflow.
    pub const MAX_AMOUNT: Money = Money(Decimal::from_parts(3_567_587_328, 232, 0, false, 0));

    /// Wraps an exact decimal amount.
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the underlying decimal at full precision.
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is exactly zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly below zero.
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the amount is strictly above zero.
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns `|self - other|`.
    pub fn abs_diff(self, other: Money) -> Money {
        (self - other).abs()
    }

    /// Returns true if `|self| <= MAX_AMOUNT`.
    pub fn is_within_range(self) -> bool {
        self.0.abs() <= Self::MAX_AMOUNT.0
    }

    /// Equality within `tolerance` (inclusive).
    pub fn approx_eq(self, other: Money, tolerance: Money) -> bool {
        self.abs_diff(other) <= tolerance
    }

    /// Multiplies by `factor` and rounds to the internal scale.
    pub fn scale_by(self, factor: Decimal) -> Money {
        Self(self.0 * factor).round_internal()
    }

    /// Returns `self * part / whole` at the internal scale.
    ///
    /// Multiplication happens before division so that repeating ratios such
    /// as 8/23 lose as little as possible. A zero `whole` yields zero.
    pub fn prorate(self, part: Money, whole: Money) -> Money {
        if whole.is_zero() {
            return Money::ZERO;
        }
        Self(self.0 * part.0 / whole.0).round_internal()
    }

    /// Rounds to the internal scale.
    pub fn round_internal(self) -> Money {
        Self(
            self.0
                .round_dp_with_strategy(Self::INTERNAL_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Rounds to the presentation scale (two decimal places, half away from zero).
    pub fn rounded(self) -> Money {
        Self(self.0.round_dp_with_strategy(
            Self::PRESENTATION_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        ))
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

/// Exact scalar multiplication; no rounding is applied.
impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Money {
        Money(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Serializes as a JSON number rounded to two decimal places.
///
/// This is a presentation format. The value goes through `f64`, so the
/// internal six-place precision does not survive a serialize/deserialize
/// round trip; only the rounded cents do.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rounded = self.rounded().0;
        match rounded.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(&rounded.to_string()),
        }
    }
}

/// Accepts decimal strings or JSON numbers.
///
/// Amounts above [`Money::MAX_AMOUNT`] in magnitude are rejected.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let money = <Decimal as Deserialize>::deserialize(deserializer).map(Money)?;
        if !money.is_within_range() {
            return Err(D::Error::custom(format!(
                "amount {} exceeds the supported magnitude of {}",
                money.0,
                Self::MAX_AMOUNT.0
            )));
        }
        Ok(money)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_keeps_exact_decimal() {
        let money: Money = "0.10".parse().unwrap();
        assert_eq!(money.amount(), dec!(0.10));
        assert_eq!(
            money + "0.20".parse::<Money>().unwrap(),
            Money::new(dec!(0.30))
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("twelve".parse::<Money>().is_err());
    }

    #[test]
    fn test_approx_eq_is_inclusive() {
        let a = Money::new(dec!(100.00));
        assert!(a.approx_eq(Money::new(dec!(100.10)), Money::new(dec!(0.10))));
        assert!(!a.approx_eq(Money::new(dec!(100.11)), Money::new(dec!(0.10))));
    }

    #[test]
    fn test_prorate_rounds_to_internal_scale() {
        // 7.00 * 8 / 23 = 2.434782608...
        let share = Money::new(dec!(7.00)).prorate(Money::new(dec!(8)), Money::new(dec!(23)));
        assert_eq!(share.amount(), dec!(2.434783));
    }

    #[test]
    fn test_prorate_by_zero_whole_is_zero() {
        let share = Money::new(dec!(7.00)).prorate(Money::new(dec!(8)), Money::ZERO);
        assert_eq!(share, Money::ZERO);
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec!(2.345)).to_string(), "2.35");
        assert_eq!(Money::new(dec!(-2.345)).to_string(), "-2.35");
        assert_eq!(Money::new(dec!(5)).to_string(), "5.00");
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Money::new(dec!(-0.01)).is_negative());
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(Money::ZERO.is_zero());
        assert!(!Money::ZERO.is_negative());
    }

    #[test]
    fn test_sum_of_amounts() {
        let amounts = [
            Money::new(dec!(12.50)),
            Money::new(dec!(8.25)),
            Money::new(dec!(14.25)),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::new(dec!(35.00)));
    }

    #[test]
    fn test_serializes_as_two_decimal_number() {
        let json = serde_json::to_value(Money::new(dec!(10.434783))).unwrap();
        assert_eq!(json, serde_json::json!(10.43));
    }

    #[test]
    fn test_round_trip_keeps_only_cents() {
        let original = Money::new(dec!(19.565217));
        let json = serde_json::to_string(&original).unwrap();
        let restored: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original.rounded());
        assert_ne!(restored, original);
    }

    #[test]
    fn test_max_amount_is_one_trillion() {
        assert_eq!(Money::MAX_AMOUNT.amount(), dec!(1_000_000_000_000));
        assert!(Money::MAX_AMOUNT.is_within_range());
        assert!((-Money::MAX_AMOUNT).is_within_range());
        assert!(!(Money::MAX_AMOUNT + Money::new(dec!(0.01))).is_within_range());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_amount() {
        let result: Result<Money, _> = serde_json::from_str("\"79000000000000000000000000000\"");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("exceeds the supported magnitude"), "{}", err);
    }

    #[test]
    fn test_deserializes_from_string_and_number() {
        let from_str: Money = serde_json::from_str("\"19.565217\"").unwrap();
        assert_eq!(from_str.amount(), dec!(19.565217));

        let from_number: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(from_number.amount(), dec!(12.5));
    }
}
