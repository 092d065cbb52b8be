//! # Money Module
//!
//! Provides the `Money` type for handling menu prices and order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a ticket in floating point:                                    │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every line item price is rounded to cents once, on the way in.      │
//! │    Totals are exact integer sums.                                      │
//! │                                                                         │
//! │  ON THE WIRE: Decimal Numbers                                           │
//! │    Persisted orders keep the historical layout `"price": 55.5`, so     │
//! │    Money serializes as a plain JSON number of major units.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comanda_core::money::Money;
//!
//! let beer = Money::from_decimal(55.50);
//! let bottle = Money::from_cents(10000);
//! assert_eq!((beer + bottle).to_string(), "$155.50");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction stays total
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde as decimal**: `Money::from_cents(5550)` is written as `55.5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a decimal amount of major units.
    ///
    /// Rounds half away from zero to the nearest cent. Non-finite input
    /// (NaN, infinity) becomes zero.
    ///
    /// ## Example
    /// ```rust
    /// use comanda_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(55.5).cents(), 5550);
    /// assert_eq!(Money::from_decimal(0.005).cents(), 1);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value as a decimal amount of major units.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (pesos) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `$155.50`, the format the menu uses for price cells.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Money::from_decimal)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(100.0).cents(), 10000);
        assert_eq!(Money::from_decimal(55.5).cents(), 5550);
        assert_eq!(Money::from_decimal(19.999).cents(), 2000);
        assert_eq!(Money::from_decimal(f64::INFINITY).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(15550).to_string(), "$155.50");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
    }

    #[test]
    fn test_sum_is_exact() {
        let prices = [0.1, 0.2, 0.3].map(Money::from_decimal);
        let total: Money = prices.iter().sum();
        assert_eq!(total.cents(), 60);
    }

    #[test]
    fn test_serializes_as_decimal_number() {
        let json = serde_json::to_string(&Money::from_cents(15550)).unwrap();
        assert_eq!(json, "155.5");

        let back: Money = serde_json::from_str("155.5").unwrap();
        assert_eq!(back.cents(), 15550);

        let whole: Money = serde_json::from_str("100").unwrap();
        assert_eq!(whole.cents(), 10000);
    }
}
