//! # Money Module
//!
//! Money normalization: parsing raw price fields, clamping negatives and
//! truncating to the rounding unit.
//!
//! ## The Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PRICE FIELD → MONEY                                                    │
//! │                                                                         │
//! │  "12,345원"                                                            │
//! │      │  parse_money_input      strip every non-digit                   │
//! │      ▼                                                                  │
//! │  12345                                                                 │
//! │      │  clamp_non_negative     negatives become 0                      │
//! │      ▼                                                                  │
//! │  12345                                                                 │
//! │      │  round_to_unit(100)     truncate toward zero                    │
//! │      ▼                                                                  │
//! │  12300                                                                 │
//! │                                                                         │
//! │  Truncation, never round-half-up: 1550 → 1500, 99 → 0                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pricecalc_core::money::{Money, RoundingUnit};
//!
//! let unit = RoundingUnit::default();
//! let price = Money::normalize_input("12,345", unit).unwrap();
//! assert_eq!(price.minor(), 12_300);
//!
//! assert!(Money::normalize_input("", unit).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationResult};
use crate::format::group_digits;
use crate::DEFAULT_ROUNDING_UNIT;

// =============================================================================
// Rounding Unit
// =============================================================================

/// The multiple every monetary value is truncated to.
///
/// Always strictly positive, so truncation can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundingUnit(i64);

impl RoundingUnit {
    /// Creates a rounding unit, rejecting zero and negative values.
    ///
    /// ## Example
    /// ```rust
    /// use pricecalc_core::money::RoundingUnit;
    ///
    /// assert_eq!(RoundingUnit::new(100).unwrap().get(), 100);
    /// assert!(RoundingUnit::new(0).is_err());
    /// ```
    pub fn new(unit: i64) -> ValidationResult<Self> {
        if unit <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "rounding_unit".to_string(),
            });
        }
        Ok(RoundingUnit(unit))
    }

    /// Returns the unit in minor units.
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl Default for RoundingUnit {
    fn default() -> Self {
        RoundingUnit(DEFAULT_ROUNDING_UNIT)
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Parses a raw price field into an integer amount.
///
/// Thousands separators and every other non-digit character are stripped
/// (this includes a leading minus sign and a decimal point). Returns `None`
/// when nothing is left or the digits do not fit an `i64`.
///
/// ## Example
/// ```rust
/// use pricecalc_core::money::parse_money_input;
///
/// assert_eq!(parse_money_input("12,345"), Some(12_345));
/// assert_eq!(parse_money_input(" 9 000원 "), Some(9_000));
/// assert_eq!(parse_money_input(""), None);
/// assert_eq!(parse_money_input("abc"), None);
/// ```
pub fn parse_money_input(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok()
}

/// Truncates toward zero to a multiple of `unit`.
///
/// ## Example
/// ```rust
/// use pricecalc_core::money::{round_to_unit, RoundingUnit};
///
/// let unit = RoundingUnit::default();
/// assert_eq!(round_to_unit(1_550, unit), 1_500);
/// assert_eq!(round_to_unit(99, unit), 0);
/// assert_eq!(round_to_unit(-150, unit), -100);
/// ```
#[inline]
pub const fn round_to_unit(n: i64, unit: RoundingUnit) -> i64 {
    // Integer division truncates toward zero; unit > 0 rules out MIN / -1.
    (n / unit.0) * unit.0
}

/// Floors negative values to zero.
#[inline]
pub const fn clamp_non_negative(n: i64) -> i64 {
    if n < 0 {
        0
    } else {
        n
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (one won for KRW).
///
/// ## Design Decisions
/// - **i64 (signed)**: margins can legitimately be negative
/// - **Single field tuple struct**: serializes as a plain JSON number
/// - **Saturating arithmetic**: absurd inputs pin at the bounds instead of
///   panicking in debug builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Floors a negative amount to zero.
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        Money(clamp_non_negative(self.0))
    }

    /// Truncates toward zero to a multiple of `unit`.
    #[inline]
    pub const fn round_to_unit(self, unit: RoundingUnit) -> Self {
        Money(round_to_unit(self.0, unit))
    }

    /// Runs a raw price field through the whole pipeline:
    /// parse, clamp, truncate.
    ///
    /// ## User Workflow
    /// ```text
    /// Competitor price field: "150,000"
    ///      │
    ///      ▼
    /// normalize_input ← THIS FUNCTION
    ///      │
    ///      ├── nothing numeric? → None (calculation unavailable)
    ///      │
    ///      └── Some(150000)
    /// ```
    pub fn normalize_input(raw: &str, unit: RoundingUnit) -> Option<Money> {
        parse_money_input(raw).map(|n| Money(n).clamp_non_negative().round_to_unit(unit))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Grouped digits without a currency symbol ("12,300").
///
/// Use [`CurrencyFormat`](crate::format::CurrencyFormat) for UI text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        f.write_str(&group_digits(self.0.unsigned_abs(), ','))
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
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
