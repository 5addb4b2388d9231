//! # Pricing Calculation
//!
//! Turns the two price fields into a [`Quote`].
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  competitor  = round(clamp(parse("150,000")))       = 150,000          │
//! │  cost        = round(clamp(parse("100,000")))       = 100,000          │
//! │                                                                         │
//! │  deduction   = match_rule(rules, competitor)        =   4,500  (3%)    │
//! │  expected    = round(competitor - deduction)        = 145,500          │
//! │  margin      = round(expected - cost)               =  45,500          │
//! │                                                                         │
//! │  Either field unparsable ──► Quote::Unavailable                         │
//! │  margin < 0 is a legitimate result (selling below cost)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::matcher::match_rule;
use crate::money::{Money, RoundingUnit};
use crate::rule::Rule;

// =============================================================================
// Quote Types
// =============================================================================

/// Everything derived from one competitor/cost price pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub competitor_price: Money,
    pub cost_price: Money,
    /// Normalized form of the rule that produced the deduction.
    pub matched_rule: Option<Rule>,
    pub deduction: Money,
    pub expected_price: Money,
    /// Expected price minus cost. May be negative.
    pub margin: Money,
}

impl PriceBreakdown {
    pub fn margin_is_negative(&self) -> bool {
        self.margin.is_negative()
    }
}

/// Result of a calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Quote {
    /// At least one price field held no number.
    Unavailable,
    Priced(PriceBreakdown),
}

impl Quote {
    /// Returns the breakdown if both prices were present.
    pub fn breakdown(&self) -> Option<&PriceBreakdown> {
        match self {
            Quote::Priced(breakdown) => Some(breakdown),
            Quote::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Quote::Priced(_))
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Calculates a quote from raw price fields.
///
/// ## Example
/// ```rust
/// use pricecalc_core::money::RoundingUnit;
/// use pricecalc_core::pricing::{calculate, Quote};
/// use pricecalc_core::rule::default_rules;
///
/// let unit = RoundingUnit::default();
/// let rules = default_rules(unit);
///
/// let quote = calculate(&rules, "150,000", "100,000", unit);
/// assert_eq!(quote.breakdown().unwrap().margin.minor(), 45_500);
///
/// assert_eq!(calculate(&rules, "", "100,000", unit), Quote::Unavailable);
/// ```
pub fn calculate(rules: &[Rule], competitor_raw: &str, cost_raw: &str, unit: RoundingUnit) -> Quote {
    let competitor = Money::normalize_input(competitor_raw, unit);
    let cost = Money::normalize_input(cost_raw, unit);

    match (competitor, cost) {
        (Some(competitor), Some(cost)) => {
            Quote::Priced(price_breakdown(rules, competitor, cost, unit))
        }
        _ => Quote::Unavailable,
    }
}

/// Calculates the breakdown for already parsed prices.
///
/// Inputs are clamped and rounded again, so callers may pass raw amounts.
pub fn price_breakdown(
    rules: &[Rule],
    competitor: Money,
    cost: Money,
    unit: RoundingUnit,
) -> PriceBreakdown {
    let competitor_price = competitor.clamp_non_negative().round_to_unit(unit);
    let cost_price = cost.clamp_non_negative().round_to_unit(unit);

    let matched = match_rule(rules, competitor_price, unit);
    let expected_price = (competitor_price - matched.deduction).round_to_unit(unit);
    let margin = (expected_price - cost_price).round_to_unit(unit);

    PriceBreakdown {
        competitor_price,
        cost_price,
        matched_rule: matched.rule,
        deduction: matched.deduction,
        expected_price,
        margin,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{default_rules, RuleKind};
    use rust_decimal::Decimal;

    fn unit() -> RoundingUnit {
        RoundingUnit::default()
    }

    #[test]
    fn test_fixed_tier() {
        let rules = default_rules(unit());
        let quote = calculate(&rules, "12,345", "9,000", unit());
        let b = quote.breakdown().unwrap();

        assert_eq!(b.competitor_price.minor(), 12_300);
        assert_eq!(b.cost_price.minor(), 9_000);
        assert_eq!(b.matched_rule, Some(Rule::fixed(10_000, Some(15_000), 1_000)));
        assert_eq!(b.deduction.minor(), 1_000);
        assert_eq!(b.expected_price.minor(), 11_300);
        assert_eq!(b.margin.minor(), 2_300);
        assert!(!b.margin_is_negative());
    }

    #[test]
    fn test_percent_tier() {
        let rules = default_rules(unit());
        let quote = calculate(&rules, "150,000", "100,000", unit());
        let b = quote.breakdown().unwrap();

        let rule = b.matched_rule.as_ref().unwrap();
        assert_eq!(rule.kind, RuleKind::Percent);
        assert_eq!(rule.value, Decimal::from(3));
        assert_eq!(b.deduction.minor(), 4_500);
        assert_eq!(b.expected_price.minor(), 145_500);
        assert_eq!(b.margin.minor(), 45_500);
    }

    #[test]
    fn test_missing_input_is_unavailable() {
        let rules = default_rules(unit());
        assert_eq!(calculate(&rules, "", "100,000", unit()), Quote::Unavailable);
        assert_eq!(calculate(&rules, "150,000", "", unit()), Quote::Unavailable);
        assert_eq!(calculate(&rules, "abc", "원", unit()), Quote::Unavailable);
        assert!(!Quote::Unavailable.is_available());
    }

    #[test]
    fn test_no_matching_rule_deducts_nothing() {
        let rules = default_rules(unit());
        let b = calculate(&rules, "5,000", "1,000", unit());
        let b = b.breakdown().unwrap();
        assert_eq!(b.matched_rule, None);
        assert_eq!(b.deduction, Money::zero());
        assert_eq!(b.expected_price.minor(), 5_000);
        assert_eq!(b.margin.minor(), 4_000);
    }

    #[test]
    fn test_negative_margin() {
        let rules = default_rules(unit());
        let quote = calculate(&rules, "12,000", "15,000", unit());
        let b = quote.breakdown().unwrap();
        assert_eq!(b.expected_price.minor(), 11_000);
        assert_eq!(b.margin.minor(), -4_000);
        assert!(b.margin_is_negative());
    }

    #[test]
    fn test_zero_prices_are_valid() {
        let quote = calculate(&[], "0", "0", unit());
        let b = quote.breakdown().unwrap();
        assert!(b.margin.is_zero());
    }

    #[test]
    fn test_breakdown_clamps_raw_amounts() {
        let b = price_breakdown(
            &[],
            Money::from_minor(-500),
            Money::from_minor(1_250),
            unit(),
        );
        assert_eq!(b.competitor_price, Money::zero());
        assert_eq!(b.cost_price.minor(), 1_200);
        assert_eq!(b.margin.minor(), -1_200);
    }

    #[test]
    fn test_quote_serialization() {
        let json = serde_json::to_value(Quote::Unavailable).unwrap();
        assert_eq!(json, serde_json::json!({"status": "unavailable"}));

        let rules = default_rules(unit());
        let json = serde_json::to_value(calculate(&rules, "12,345", "9,000", unit())).unwrap();
        assert_eq!(json["status"], "priced");
        assert_eq!(json["expectedPrice"], 11_300);
        assert_eq!(json["matchedRule"]["kind"], "fixed");
    }
}
