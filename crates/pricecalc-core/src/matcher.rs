//! # Rule Matcher
//!
//! First-match evaluation of a rule schedule against a competitor price.
//!
//! ## Matching Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  match_rule(rules, 150,000)                                             │
//! │                                                                         │
//! │  for rule in rules (in order):                                          │
//! │      rule = rule.normalized(unit)                                       │
//! │      invalid?            ──► skip                                       │
//! │      min ≤ value ≤ max?  ──► FIRST HIT WINS, stop                       │
//! │                                                                         │
//! │  deduction                                                              │
//! │      fixed    round(value)                                              │
//! │      percent  round(floor(price × pct / 100))                           │
//! │                                                                         │
//! │  nothing matched ──► RuleMatch { rule: None, deduction: 0 }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Overlapping tiers are legal; order decides. With the default schedule
//! 100,000 falls in both the last fixed tier and the open-ended percent
//! tier, and the fixed one wins.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::money::{Money, RoundingUnit};
use crate::rule::{Rule, RuleKind};

/// Outcome of evaluating the schedule against one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RuleMatch {
    /// The matched rule in normalized form.
    pub rule: Option<Rule>,
    pub deduction: Money,
}

impl RuleMatch {
    /// No rule applies: nothing is deducted.
    pub fn none() -> Self {
        RuleMatch {
            rule: None,
            deduction: Money::zero(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.rule.is_some()
    }
}

/// Finds the first rule covering `value` and computes its deduction.
///
/// ## Example
/// ```rust
/// use pricecalc_core::matcher::match_rule;
/// use pricecalc_core::money::{Money, RoundingUnit};
/// use pricecalc_core::rule::default_rules;
///
/// let unit = RoundingUnit::default();
/// let rules = default_rules(unit);
///
/// let hit = match_rule(&rules, Money::from_minor(150_000), unit);
/// assert_eq!(hit.deduction.minor(), 4_500);
///
/// let miss = match_rule(&rules, Money::from_minor(500), unit);
/// assert!(!miss.is_match());
/// ```
pub fn match_rule(rules: &[Rule], value: Money, unit: RoundingUnit) -> RuleMatch {
    rules
        .iter()
        .map(|rule| rule.normalized(unit))
        .filter(Rule::is_valid)
        .find(|rule| rule.contains(value))
        .map(|rule| RuleMatch {
            deduction: compute_deduction(&rule, value, unit),
            rule: Some(rule),
        })
        .unwrap_or_else(RuleMatch::none)
}

/// Deduction a normalized rule takes from `price`.
///
/// Percent deductions are computed in exact decimal arithmetic, floored,
/// then truncated to the unit. Results too large for `i64` saturate.
pub fn compute_deduction(rule: &Rule, price: Money, unit: RoundingUnit) -> Money {
    let amount = match rule.kind {
        RuleKind::Fixed => rule.value,
        RuleKind::Percent => Decimal::from(price.minor())
            .checked_mul(rule.value)
            .map(|scaled| scaled / Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::MAX),
    };
    let whole = amount.floor().to_i64().unwrap_or(i64::MAX);
    Money::from_minor(whole).round_to_unit(unit)
}

// =============================================================================
// Unit Tests
// =============================================================================
