//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point drift when
//! many service totals are summed. Provides safe arithmetic operations,
//! scaled multiplication and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::decimal::{div_round, parse_scaled};
use super::percentage::Percentage;
use super::quantity::Quantity;

/// Currency symbols accepted in front of a parsed amount, longest first
const CURRENCY_SYMBOLS: [&str; 4] = ["R$", "$", "€", "£"];

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
///
/// Addition and subtraction saturate at the bounds of `i64` cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use sitebudget::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Multiply a unit price by a quantity, rounding to the nearest cent
    pub fn times(&self, quantity: Quantity) -> Self {
        let product = i128::from(self.0) * i128::from(quantity.thousandths());
        Self(div_round(product, i128::from(Quantity::SCALE)))
    }

    /// Apply a percentage to this amount, rounding to the nearest cent
    pub fn percent(&self, rate: Percentage) -> Self {
        let product = i128::from(self.0) * i128::from(rate.basis_points());
        Self(div_round(product, i128::from(Percentage::SCALE) * 100))
    }

    /// Express this amount as a percentage of `whole`
    ///
    /// Returns `None` unless `whole` is strictly positive, so callers never
    /// see a division by zero or a meaningless negative base.
    pub fn ratio_of(&self, whole: Money) -> Option<Percentage> {
        if !whole.is_positive() {
            return None;
        }
        let scaled = i128::from(self.0) * i128::from(Percentage::SCALE) * 100;
        Some(Percentage::from_basis_points(div_round(
            scaled,
            i128::from(whole.0),
        )))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts "10,50", "10.50", "-10,50", "$10.50", "10". A single `,` or `.`
    /// is the decimal separator. Only a known currency symbol may precede the
    /// digits.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, trimmed)
        };

        let rest = CURRENCY_SYMBOLS
            .iter()
            .find_map(|symbol| rest.strip_prefix(*symbol))
            .map_or(rest, str::trim_start);

        let cents = parse_scaled(rest, 2)
            .filter(|c| *c >= 0)
            .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }

    /// Format as a plain decimal number, without symbol (used by exports)
    pub fn format_plain(&self) -> String {
        if self.is_negative() {
            format!("-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            format!("{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(Money::from_cents(5).format_with_symbol("R$ "), "R$ 0.05");
        assert_eq!(Money::from_cents(-5).format_plain(), "-0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("10,50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("R$ 10,5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_leading_text() {
        assert!(Money::parse("abc5").is_err());
        assert!(Money::parse("x10").is_err());
        assert!(Money::parse("x1,5").is_err());
        assert!(Money::parse("$$5").is_err());
        assert!(Money::parse("-").is_err());
        assert_eq!(Money::parse("-$5").unwrap().cents(), -500);
        assert_eq!(Money::parse("€ 5,25").unwrap().cents(), 525);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(i64::MAX - 10);
        assert_eq!(big + Money::from_cents(100), Money::from_cents(i64::MAX));
        assert_eq!(-big - Money::from_cents(100), Money::from_cents(i64::MIN));

        let mut total = big;
        total += big;
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!([big, big, big].iter().sum::<Money>().cents(), i64::MAX);
        assert_eq!(Money::from_cents(i64::MIN).abs().cents(), i64::MAX);
    }

    #[test]
    fn test_times_quantity() {
        let unit = Money::from_cents(1000);
        assert_eq!(unit.times(Quantity::from_units(2)).cents(), 2000);
        // 2.5 x 3.33 = 8.325 -> 8.33
        let unit = Money::from_cents(333);
        assert_eq!(unit.times(Quantity::from_thousandths(2500)).cents(), 833);
        assert_eq!(unit.times(Quantity::zero()), Money::zero());
    }

    #[test]
    fn test_percent() {
        let subtotal = Money::from_cents(3000);
        assert_eq!(subtotal.percent(Percentage::from_whole(10)).cents(), 300);
        // 12.5% of 99.99 = 12.49875 -> 12.50
        let subtotal = Money::from_cents(9999);
        assert_eq!(
            subtotal.percent(Percentage::from_basis_points(1250)).cents(),
            1250
        );
    }

    #[test]
    fn test_ratio_of() {
        let realized = Money::from_cents(1500);
        let total = Money::from_cents(3000);
        assert_eq!(realized.ratio_of(total), Some(Percentage::from_whole(50)));
        assert_eq!(realized.ratio_of(Money::zero()), None);
        assert_eq!(realized.ratio_of(Money::from_cents(-100)), None);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.cents(), 600);
        let empty: Vec<Money> = Vec::new();
        assert_eq!(empty.into_iter().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
