//! # Money Module
//!
//! Provides the `Money` type for zakat amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats:                                                           │
//! │    100.00 + 250.50 + 0.10 = 350.59999999999997  ❌                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (sen, 1/100 rupiah)                  │
//! │    10000 + 25050 + 10 = 35060 → "350.60"  ✅                            │
//! │                                                                         │
//! │  The column is DECIMAL(15,2) in spirit: two fractional digits, exact.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use zakat_core::money::Money;
//!
//! let amount: Money = "250.50".parse().unwrap();
//! assert_eq!(amount.minor(), 25050);
//!
//! let total = amount + Money::from_major_minor(100, 0);
//! assert_eq!(total.to_string(), "350.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

const FIELD: &str = "amount";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (sen).
///
/// Stored in SQLite as a plain INTEGER.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use zakat_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(10050).to_string(), "100.50");
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupiah portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fractional portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Average of this total over `count` items, rounded half away from zero
    /// to the nearest minor unit. A zero count averages to zero.
    ///
    /// ```rust
    /// use zakat_core::money::Money;
    ///
    /// // 100.00 / 3 = 33.333... → 33.33
    /// assert_eq!(Money::from_minor(10000).average_of(3).minor(), 3333);
    /// // 0.05 / 2 = 0.025 → 0.03
    /// assert_eq!(Money::from_minor(5).average_of(2).minor(), 3);
    /// ```
    pub fn average_of(&self, count: i64) -> Money {
        if count <= 0 {
            return Money::zero();
        }

        let quotient = self.0 / count;
        let remainder = self.0 % count;

        // Round half away from zero: compare 2×remainder against the divisor
        if remainder.abs() * 2 >= count {
            Money(quotient + self.0.signum())
        } else {
            Money(quotient)
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text such as `"100"`, `"100.5"` or `"-2.25"`.
///
/// At most two fractional digits are accepted; anything finer cannot be
/// stored without rounding and is rejected instead.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(ValidationError::Required {
                field: FIELD.to_string(),
            });
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (major_text, minor_text) = match digits.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (digits, None),
        };

        if major_text.is_empty() || !major_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a decimal number like 100.50"));
        }

        let minor = match minor_text {
            None => 0,
            Some(m) if m.is_empty() || m.len() > 2 || !m.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid("at most two digits are allowed after the decimal point"));
            }
            // "5" means 50 sen, "05" means 5 sen
            Some(m) if m.len() == 1 => m.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            Some(m) => m.parse::<i64>().map_err(|_| invalid("bad fraction"))?,
        };

        let total = major_text
            .parse::<i64>()
            .ok()
            .and_then(|major| major.checked_mul(100))
            .and_then(|major| major.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

fn invalid(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: FIELD.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering with two fractional digits. Currency symbols and
/// thousands separators belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
