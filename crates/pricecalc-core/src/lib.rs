//! # pricecalc-core: Pure Pricing Logic
//!
//! This crate is the **heart** of pricecalc. Given a competitor price and a
//! cost price, it finds the deduction for the first matching tier of an
//! ordered rule schedule and derives the expected sale price and margin.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pricecalc Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI (host)                            │   │
//! │  │    Price inputs ──► Rule editor ──► Result panel               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw strings                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Calculator session (apps/calculator)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pricecalc-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  rule   │ │ matcher │ │ pricing │ │ format  │  │   │
//! │  │   │  parse  │ │ RawRule │ │ first-  │ │ expected│ │ 12,300원│  │   │
//! │  │   │  round  │ │ Rule    │ │ match   │ │ margin  │ │ 3% (..) │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pricecalc-store (Persistence)                │   │
//! │  │              key-value storage, load / save / reset             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type, input parsing, unit rounding
//! - [`rule`] - Raw and canonical rules, normalization, default schedule
//! - [`schedule`] - Ordered, editable rule list
//! - [`matcher`] - First-match rule evaluation and deduction
//! - [`pricing`] - Expected price and margin
//! - [`format`] - Display strings for the UI host
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output
//! 2. **Integer Money**: every amount is a whole number of minor units
//! 3. **Truncating Rounding**: amounts land on multiples of the rounding unit,
//!    always toward zero
//! 4. **Parse, Don't Trust**: loosely typed data only becomes a [`Rule`]
//!    through [`rule::normalize_rule`]
//!
//! ## Example Usage
//!
//! ```rust
//! use pricecalc_core::money::RoundingUnit;
//! use pricecalc_core::pricing::calculate;
//! use pricecalc_core::rule::default_rules;
//!
//! let unit = RoundingUnit::default(); // 100
//! let rules = default_rules(unit);
//!
//! let quote = calculate(&rules, "12,345", "9,000", unit);
//! let breakdown = quote.breakdown().unwrap();
//!
//! assert_eq!(breakdown.deduction.minor(), 1_000);
//! assert_eq!(breakdown.expected_price.minor(), 11_300);
//! assert_eq!(breakdown.margin.minor(), 2_300);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod matcher;
pub mod money;
pub mod pricing;
pub mod rule;
pub mod schedule;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use format::{CurrencyFormat, QuoteView, SymbolPosition};
pub use matcher::{match_rule, RuleMatch};
pub use money::{Money, RoundingUnit};
pub use pricing::{calculate, PriceBreakdown, Quote};
pub use rule::{RawRule, Rule, RuleKind};
pub use schedule::{RuleEdit, RuleSchedule};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default rounding unit in minor units.
///
/// Every monetary figure is truncated to a multiple of this value, so the
/// UI never shows noise below the hundreds.
pub const DEFAULT_ROUNDING_UNIT: i64 = 100;
