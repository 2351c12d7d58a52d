//! Type-safe price representation using decimal arithmetic.
//!
//! The lessons backend sends prices as bare JSON numbers, so `Price`
//! (de)serializes as a float while keeping `Decimal` precision for sums.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost of one unit of a lesson.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self * quantity
    }

    /// Format with exactly two decimal places (e.g. `42.50`).
    #[must_use]
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.0)
    }
}

/// Formats the amount the way the backend writes it: `42`, `42.5`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_integer_and_fraction() {
        let whole: Price = serde_json::from_str("42").unwrap();
        assert_eq!(whole, Price::from_units(42));
        assert_eq!(whole.to_string(), "42");

        let fraction: Price = serde_json::from_str("42.5").unwrap();
        assert_eq!(fraction.to_string(), "42.5");
        assert_eq!(fraction.display_amount(), "42.50");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Price::new(Decimal::new(1250, 2))).unwrap();
        assert_eq!(json, "12.5");
    }

    #[test]
    fn test_line_arithmetic() {
        let unit = Price::new(Decimal::new(1999, 2));
        assert_eq!(unit.times(3).display_amount(), "59.97");

        let total: Price = [Price::from_units(10), Price::from_units(5)].into_iter().sum();
        assert_eq!(total, Price::from_units(15));
    }
}
