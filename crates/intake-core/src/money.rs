//! # Money Module
//!
//! Provides the `Money` type for order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing raw doubles:                                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │    (a + b) + c != a + (b + c)       → total depends on item order      │
//! │                                                                         │
//! │  OUR POLICY: Integer Cents                                              │
//! │    unitPrice 9.99 ──► 999 cents (round half to even, once, on ingest)  │
//! │    line total  = 999 × 2 = 1998 cents (checked integer multiply)       │
//! │    order total = Σ line totals         (checked integer add)           │
//! │                                                                         │
//! │  Integer addition is exact, so the total is independent of the order  │
//! │  in which line items were submitted.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Form
//! Clients speak decimal amounts (`"unitPrice": 9.99`, `"totalAmount": 19.98`).
//! `Money` serializes to and from that decimal form; inside the crate it is
//! always cents.
//!
//! ## Usage
//! ```rust
//! use intake_core::money::Money;
//!
//! let price = Money::from_decimal(9.99).unwrap();
//! assert_eq!(price.cents(), 999);
//!
//! let line_total = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(line_total.to_string(), "$19.98");
//! ```

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Cents per major currency unit.
const CENTS_PER_UNIT: f64 = 100.0;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: order amounts are never negative here, but the type
///   does not forbid it
/// - **Checked arithmetic** for anything derived from client input, so an
///   absurd quantity can never wrap around into a plausible total
/// - **Decimal serde**: the JSON contract carries decimal amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use intake_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a submitted decimal amount to cents.
    ///
    /// Rounds half to even at the cent. Returns `None` for NaN, infinities,
    /// and values whose cent count does not fit in an i64.
    ///
    /// ```rust
    /// use intake_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(9.99).unwrap().cents(), 999);
    /// assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 12);  // half → even
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let cents = (amount * CENTS_PER_UNIT).round_ties_even();

        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        if cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount as a decimal, for the wire.
    ///
    /// Exact for every amount below 2^53 cents, which covers any total an
    /// order can realistically reach.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / CENTS_PER_UNIT
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ```rust
    /// use intake_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(250);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().cents(), 750);
    /// assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i32) -> Option<Self> {
        match self.0.checked_mul(qty as i64) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts with overflow detection.
    ///
    /// ```rust
    /// use intake_core::money::Money;
    ///
    /// let total = Money::checked_sum([Money::from_cents(1000), Money::from_cents(750)]);
    /// assert_eq!(total, Some(Money::from_cents(1750)));
    /// ```
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable form, for logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).ok_or_else(|| {
            de::Error::custom(format!("amount {amount} is not representable in cents"))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_common_prices() {
        assert_eq!(Money::from_decimal(9.99), Some(Money::from_cents(999)));
        assert_eq!(Money::from_decimal(10.0), Some(Money::from_cents(1000)));
        assert_eq!(Money::from_decimal(2.5), Some(Money::from_cents(250)));
        assert_eq!(Money::from_decimal(0.01), Some(Money::from_cents(1)));
        assert_eq!(Money::from_decimal(0.0), Some(Money::zero()));
    }

    #[test]
    fn test_from_decimal_rounds_half_to_even() {
        // 0.125 and 0.375 are exact in binary, so these are true ties
        assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 12);
        assert_eq!(Money::from_decimal(0.375).unwrap().cents(), 38);
        assert_eq!(Money::from_decimal(1.004).unwrap().cents(), 100);
        assert_eq!(Money::from_decimal(1.006).unwrap().cents(), 101);
    }

    #[test]
    fn test_from_decimal_rejects_unrepresentable() {
        assert!(Money::from_decimal(f64::NAN).is_none());
        assert!(Money::from_decimal(f64::INFINITY).is_none());
        assert!(Money::from_decimal(f64::NEG_INFINITY).is_none());
        assert!(Money::from_decimal(1e300).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1998).to_string(), "$19.98");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_checked_arithmetic() {
        let unit = Money::from_cents(999);
        assert_eq!(unit.checked_mul_quantity(2), Some(Money::from_cents(1998)));
        assert_eq!(unit.checked_mul_quantity(0), Some(Money::zero()));
        assert!(Money::from_cents(i64::MAX / 2 + 1)
            .checked_mul_quantity(2)
            .is_none());
        assert!(Money::from_cents(i64::MAX)
            .checked_add(Money::from_cents(1))
            .is_none());
    }

    #[test]
    fn test_checked_sum_is_order_independent() {
        let forward = Money::checked_sum([
            Money::from_cents(1000),
            Money::from_cents(750),
            Money::from_cents(1),
        ]);
        let reversed = Money::checked_sum([
            Money::from_cents(1),
            Money::from_cents(750),
            Money::from_cents(1000),
        ]);
        assert_eq!(forward, Some(Money::from_cents(1751)));
        assert_eq!(forward, reversed);
        assert_eq!(Money::checked_sum(std::iter::empty()), Some(Money::zero()));
    }

    #[test]
    fn test_serde_uses_decimal_form() {
        let json = serde_json::to_string(&Money::from_cents(1998)).unwrap();
        assert_eq!(json, "19.98");

        let back: Money = serde_json::from_str("17.5").unwrap();
        assert_eq!(back.cents(), 1750);

        assert!(serde_json::from_str::<Money>("1e300").is_err());
    }
}
