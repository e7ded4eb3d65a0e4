//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that fee totals, paid amounts
//! and pending amounts always reconcile exactly. On the wire amounts are plain
//! JSON numbers with a decimal fraction.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use tuition_ledger::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units and cents
    ///
    /// # Examples
    /// ```
    /// use tuition_ledger::models::Money;
    /// let amount = Money::from_units_cents(10, 50); // 10.50
    /// ```
    pub const fn from_units_cents(units: i64, cents: i64) -> Self {
        Self(units * 100 + cents)
    }

    /// Create a Money amount from a decimal number, rounded to the nearest cent
    ///
    /// Returns `None` for NaN, infinite values, and amounts whose cents do
    /// not fit in an `i64`.
    pub fn from_decimal(value: f64) -> Option<Self> {
        // 2^63; every f64 below it in magnitude converts without saturating
        const CENTS_LIMIT: f64 = 9_223_372_036_854_775_808.0;

        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents >= CENTS_LIMIT || cents < -CENTS_LIMIT {
            return None;
        }
        Some(Self(cents as i64))
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

    /// The amount as a decimal number, for the wire format
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
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
        Self(self.0.abs())
    }

    /// A percentage of this amount, rounded half away from zero to the cent
    pub fn percent(&self, percentage: f64) -> Self {
        Self((self.0 as f64 * percentage / 100.0).round() as i64)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);

        let cents = if s.contains('.') {
            let parts: Vec<&str> = s.split('.').collect();
            if parts.len() != 2 {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }

            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
            };

            // Pad or truncate cents to 2 digits
            let cents_str = parts[1];
            if !cents_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(MoneyParseError::InvalidFormat(s.to_string()));
            }
            let cents: i64 = match cents_str.len() {
                0 => 0,
                1 => {
                    cents_str
                        .parse::<i64>()
                        .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?
                        * 10
                }
                _ => cents_str[..2]
                    .parse()
                    .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?,
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(cents))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        } else {
            s.parse::<i64>()
                .ok()
                .and_then(|units| units.checked_mul(100))
                .ok_or_else(|| MoneyParseError::InvalidFormat(s.to_string()))?
        };

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
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_decimal(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", value)))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
    fn test_display_has_two_fraction_digits() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(10000).format_with_symbol("$"), "$100.00");
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
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".75").unwrap().cents(), 75);
        assert!(Money::parse("ten").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
        assert!(Money::parse("92233720368547758.08").is_err());
    }

    #[test]
    fn test_from_decimal_rejects_out_of_range() {
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(1e17).is_none());
        assert!(Money::from_decimal(-1e17).is_none());
        assert_eq!(
            Money::from_decimal(1e15).unwrap().cents(),
            100_000_000_000_000_000
        );
    }

    #[test]
    fn test_percent_rounds_to_cent() {
        assert_eq!(Money::from_cents(10000).percent(40.0).cents(), 4000);
        assert_eq!(Money::from_cents(999).percent(50.0).cents(), 500);
        assert_eq!(Money::from_cents(10000).percent(0.0), Money::zero());
    }

    #[test]
    fn test_sum() {
        let total: Money = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ]
        .into_iter()
        .sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_wire_format_is_decimal_number() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "10.5");

        let back: Money = serde_json::from_str("10.5").unwrap();
        assert_eq!(back, m);

        let whole: Money = serde_json::from_str("100").unwrap();
        assert_eq!(whole.cents(), 10000);

        // 0.1 + 0.2 style drift is absorbed by rounding to the cent
        let drift: Money = serde_json::from_str("0.30000000000000004").unwrap();
        assert_eq!(drift.cents(), 30);

        let err = serde_json::from_str::<Money>("1e300").unwrap_err();
        assert!(err.to_string().contains("invalid amount"));
    }
}
