//! # Money Module
//!
//! Provides the `Money` type for prices, purchase totals and import costs.
//!
//! ## Text ⇄ Cents
//! ```text
//!   input token          stored           printed
//!   ───────────          ──────           ───────
//!   "12.5"        ──►    1250      ──►    "12.50"
//!   ".75"         ──►      75      ──►    "0.75"
//!   "1.235"       ──►     124      ──►    "1.24"      (half-up past 2 digits)
//!   buy 3 @ 1250  ──►    3750      ──►    "37.50"     (checked multiply)
//! ```
//!
//! Cents are held in an `i128`: the largest purchase, a 13-digit price times
//! a 10-digit quantity, is about 10^25 cents, and sums of those stay far
//! below the `i128` range for any history that fits in memory.
//!
//! ## Usage
//! ```rust
//! use tome_core::money::Money;
//!
//! let price = Money::parse_decimal("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let total = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(total.to_string(), "21.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed, since a net profit can be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i128);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i128) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i128 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn dollars(&self) -> i128 {
        self.0 / 100
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i128 {
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Parses a non-negative decimal such as `12`, `12.5`, `.75` or `3.`.
    ///
    /// ## Rounding
    /// Digits past the second fraction digit are rounded half-up:
    /// ```text
    /// "1.234" → 123     "1.235" → 124     "0.005" → 1
    /// ```
    ///
    /// Returns `None` for anything that is not digits with at most one
    /// decimal point and at least one digit, or that overflows.
    ///
    /// ## Example
    /// ```rust
    /// use tome_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.50").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
    /// assert!(Money::parse_decimal("1.2.3").is_none());
    /// assert!(Money::parse_decimal(".").is_none());
    /// ```
    pub fn parse_decimal(text: &str) -> Option<Money> {
        let (whole, frac) = match text.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (text, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let mut cents: i128 = 0;
        for digit in whole.bytes() {
            cents = cents.checked_mul(10)?.checked_add(i128::from(digit - b'0'))?;
        }

        let mut frac_digits = frac.bytes().map(|b| i128::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().is_some_and(|d| d >= 5);

        cents = cents
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths + i128::from(round_up))?;

        Some(Money(cents))
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tome_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().cents(), 897);
    /// assert!(Money::from_cents(i128::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(i128::from(qty)).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Always two fraction digits, no currency symbol: `25.00`, `-3.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            self.dollars().unsigned_abs(),
            self.cents_part()
        )
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
