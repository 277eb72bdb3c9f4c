//! Money type with exact fen precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as whole fen (0.01 yuan) in an `i64`. Budgets are
//! entered in wan (10,000 yuan) and expenses in yuan; both convert losslessly.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const FEN_PER_YUAN: i64 = 100;
const FEN_PER_WAN: i64 = 1_000_000;

/// Largest magnitude accepted from user input: one billion wan.
///
/// Sums of many such amounts stay far below `i64::MAX` fen.
pub const MAX_INPUT_FEN: i64 = 1_000_000_000 * FEN_PER_WAN;

/// Errors raised when converting a decimal into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The amount has precision below one fen.
    #[error("amount {0} is more precise than one fen")]
    SubFen(Decimal),

    /// The amount does not fit into the storage range.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// An exact monetary amount in Chinese yuan, held as fen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero yuan.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole fen.
    #[must_use]
    pub const fn from_fen(fen: i64) -> Self {
        Self(fen)
    }

    /// Returns the amount in fen.
    #[must_use]
    pub const fn fen(self) -> i64 {
        self.0
    }

    /// Converts a yuan amount. Fails if it has more than two decimals.
    pub fn from_yuan(yuan: Decimal) -> Result<Self, MoneyError> {
        Self::scaled(yuan, FEN_PER_YUAN)
    }

    /// Converts a wan amount. Fails if it is not a whole number of fen.
    pub fn from_wan(wan: Decimal) -> Result<Self, MoneyError> {
        Self::scaled(wan, FEN_PER_WAN)
    }

    fn scaled(value: Decimal, factor: i64) -> Result<Self, MoneyError> {
        let fen = value
            .checked_mul(Decimal::from(factor))
            .ok_or(MoneyError::OutOfRange(value))?;
        if !fen.fract().is_zero() {
            return Err(MoneyError::SubFen(value));
        }
        fen.to_i64()
            .filter(|fen| (-MAX_INPUT_FEN..=MAX_INPUT_FEN).contains(fen))
            .map(Self)
            .ok_or(MoneyError::OutOfRange(value))
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(fen) => Some(Self(fen)),
            None => None,
        }
    }

    /// Returns the amount in yuan.
    #[must_use]
    pub fn yuan(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the amount in wan.
    #[must_use]
    pub fn wan(self) -> Decimal {
        Decimal::new(self.0, 6).normalize()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

/// Percentage of `budget` already spent, rounded to two decimals.
///
/// A zero budget yields zero rather than an error.
#[must_use]
pub fn execution_rate(spent: Money, budget: Money) -> Decimal {
    if budget.is_zero() {
        return Decimal::ZERO;
    }
    (Decimal::from(spent.0) * Decimal::ONE_HUNDRED / Decimal::from(budget.0)).round_dp(2)
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.yuan())
    }
}

// JSON carries yuan as a decimal string, e.g. "1234.50".
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.yuan(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let yuan = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::from_yuan(yuan).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for fields expressed in wan instead of yuan.
///
/// Use with `#[serde(with = "fundtrack_shared::types::money::wan")]`.
pub mod wan {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Money;

    /// Serializes as a wan decimal string.
    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&money.wan(), serializer)
    }

    /// Deserializes from a wan decimal (string or number).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_wan(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_yuan() {
        assert_eq!(Money::from_yuan(dec!(12.34)).unwrap().fen(), 1234);
        assert_eq!(Money::from_yuan(dec!(5)).unwrap().fen(), 500);
        assert_eq!(
            Money::from_yuan(dec!(0.001)),
            Err(MoneyError::SubFen(dec!(0.001)))
        );
    }

    #[test]
    fn test_from_wan() {
        let money = Money::from_wan(dec!(1.5)).unwrap();
        assert_eq!(money.yuan(), dec!(15000.00));
        assert_eq!(money.wan(), dec!(1.5));
        assert!(Money::from_wan(dec!(0.00000001)).is_err());
    }

    #[test]
    fn test_input_bound() {
        let max = Money::from_wan(dec!(1000000000)).unwrap();
        assert_eq!(max.fen(), MAX_INPUT_FEN);
        assert_eq!(
            Money::from_wan(dec!(5000000000000)),
            Err(MoneyError::OutOfRange(dec!(5000000000000)))
        );
        assert!(Money::from_yuan(dec!(-10000000000000.01)).is_err());
    }

    #[test]
    fn test_checked_add() {
        let big = Money::from_fen(i64::MAX / 2 + 1);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(
            Money::from_fen(1).checked_add(Money::from_fen(2)),
            Some(Money::from_fen(3))
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_fen(150);
        let b = Money::from_fen(50);
        assert_eq!(a + b, Money::from_fen(200));
        assert_eq!(a - b, Money::from_fen(100));
        assert_eq!(-a, Money::from_fen(-150));
        assert_eq!([a, b].iter().sum::<Money>(), Money::from_fen(200));
        assert!((b - a).is_negative());
        assert!(Money::ZERO.is_zero());
    }

    #[rstest]
    #[case(0, 100, dec!(0))]
    #[case(50, 100, dec!(50))]
    #[case(1, 3, dec!(33.33))]
    #[case(2, 3, dec!(66.67))]
    #[case(150, 100, dec!(150))]
    #[case(10, 0, dec!(0))]
    fn test_execution_rate(#[case] spent: i64, #[case] budget: i64, #[case] expected: Decimal) {
        assert_eq!(
            execution_rate(Money::from_fen(spent), Money::from_fen(budget)),
            expected
        );
    }

    #[test]
    fn test_serde_as_yuan() {
        let money = Money::from_fen(123_450);
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"1234.50\"");
        let back: Money = serde_json::from_str("\"1234.5\"").unwrap();
        assert_eq!(back, money);
        assert!(serde_json::from_str::<Money>("\"0.005\"").is_err());
    }

    #[test]
    fn test_serde_as_wan() {
        #[derive(Serialize, Deserialize)]
        struct Row {
            #[serde(with = "wan")]
            amount: Money,
        }

        let row: Row = serde_json::from_str(r#"{"amount":"12.5"}"#).unwrap();
        assert_eq!(row.amount.yuan(), dec!(125000));
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"{"amount":"12.5"}"#);
    }
}
