//! # Rule Model
//!
//! Pricing tiers: the loosely typed [`RawRule`] as it arrives from storage or
//! the rule editor, the canonical [`Rule`] the engine works with, and the one
//! conversion between them, [`normalize_rule`].
//!
//! ## Raw → Canonical
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        normalize_rule                                   │
//! │                                                                         │
//! │  RawRule (serde_json::Value fields)       Rule (typed)                  │
//! │  ───────────────────────────────          ─────────────────────         │
//! │  min   "15,100" / 15100.7 / "x"   ──►     min   Money   (≥ 0, rounded)  │
//! │  max   null / "" / "abc" / 30000  ──►     max   Option<Money>           │
//! │  kind  "percent" / "PERCENT" / ?  ──►     kind  Fixed | Percent         │
//! │  value "3" / -5 / true            ──►     value Decimal (≥ 0)           │
//! │                                                                         │
//! │  Nothing here fails: bad fields fall back (min/value → 0,               │
//! │  max → unbounded, kind → fixed).                                        │
//! │                                                                         │
//! │  Validity is separate: max < min keeps the Rule but marks it invalid.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Form
//! ```json
//! [
//!   { "min": 10000, "max": 15000, "kind": "fixed",   "value": 1000 },
//!   { "min": 100000, "max": null, "kind": "percent", "value": 3 }
//! ]
//! ```
//! Older data names the `kind` field `type`; both are read.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::{Money, RoundingUnit};

// =============================================================================
// Rule Kind
// =============================================================================

/// How a matched rule turns into a deduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// A flat amount subtracted from the competitor price.
    #[default]
    Fixed,
    /// A percentage of the competitor price.
    Percent,
}

impl RuleKind {
    /// Reads a kind from untyped data. Only "percent" (any ASCII case,
    /// surrounding whitespace ignored) selects [`RuleKind::Percent`].
    pub fn from_raw(raw: &Value) -> Self {
        match raw {
            Value::String(s) if s.trim().eq_ignore_ascii_case("percent") => RuleKind::Percent,
            _ => RuleKind::Fixed,
        }
    }

    /// Returns the persisted name of the kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Fixed => "fixed",
            RuleKind::Percent => "percent",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Rule
// =============================================================================

/// One tier of the pricing schedule, in canonical form.
///
/// Both bounds are inclusive. A rule with a bounded `max` below `min` is
/// kept around (the user may still be typing) but never matches and is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Rule {
    /// Inclusive lower bound.
    pub min: Money,

    /// Inclusive upper bound, `None` for "and above".
    pub max: Option<Money>,

    pub kind: RuleKind,

    /// Fixed: an amount in minor units (always integral).
    /// Percent: the percentage, exactly as entered (3.5 means 3.5%).
    #[serde(serialize_with = "serialize_value")]
    #[ts(type = "number")]
    pub value: Decimal,
}

impl Rule {
    /// Creates a fixed-amount rule. Not normalized.
    pub fn fixed(min: i64, max: Option<i64>, amount: i64) -> Self {
        Rule {
            min: Money::from_minor(min),
            max: max.map(Money::from_minor),
            kind: RuleKind::Fixed,
            value: Decimal::from(amount),
        }
    }

    /// Creates a percentage rule. Not normalized.
    pub fn percent(min: i64, max: Option<i64>, percent: Decimal) -> Self {
        Rule {
            min: Money::from_minor(min),
            max: max.map(Money::from_minor),
            kind: RuleKind::Percent,
            value: percent,
        }
    }

    /// Creates the rule the editor appends: `{0, unbounded, fixed, 0}`.
    pub fn blank() -> Self {
        Rule::fixed(0, None, 0)
    }

    /// A rule is valid when `max` is unbounded or not below `min`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.max.map_or(true, |max| max >= self.min)
    }

    /// Checks whether `value` falls inside `[min, max]`.
    #[inline]
    pub fn contains(&self, value: Money) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }

    /// Re-applies field normalization to an already typed rule.
    ///
    /// Equivalent to `normalize_rule(&RawRule::from(self), unit)` without
    /// the round trip through JSON values.
    pub fn normalized(&self, unit: RoundingUnit) -> Rule {
        Rule {
            min: normalize_money(self.min, unit),
            max: self.max.map(|max| normalize_money(max, unit)),
            kind: self.kind,
            value: normalize_value(self.value, self.kind, unit),
        }
    }
}

/// Integral values go out as JSON integers, fractional percentages as floats.
///
/// The float is parsed from the decimal text, so a value of at most
/// [`PERCENT_SIGNIFICANT_DIGITS`] significant digits reads back unchanged.
fn serialize_value<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero() {
        if let Some(n) = value.to_i64() {
            return serializer.serialize_i64(n);
        }
    }
    serializer.serialize_f64(value.to_string().parse::<f64>().unwrap_or(0.0))
}

// =============================================================================
// Raw Rule
// =============================================================================

/// A rule before normalization: every field is whatever the source held.
///
/// Deserializing never fails. Non-object entries become a rule with every
/// field missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct RawRule {
    pub min: Value,
    pub max: Value,
    pub kind: Value,
    pub value: Value,
}

impl RawRule {
    /// Builds a raw rule from rule editor text fields.
    pub fn new(min: &str, max: &str, kind: &str, value: &str) -> Self {
        RawRule {
            min: Value::from(min),
            max: Value::from(max),
            kind: Value::from(kind),
            value: Value::from(value),
        }
    }
}

impl From<Value> for RawRule {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => RawRule {
                min: fields.remove("min").unwrap_or(Value::Null),
                max: fields.remove("max").unwrap_or(Value::Null),
                kind: fields
                    .remove("kind")
                    .or_else(|| fields.remove("type"))
                    .unwrap_or(Value::Null),
                value: fields.remove("value").unwrap_or(Value::Null),
            },
            _ => RawRule::default(),
        }
    }
}

impl From<&Rule> for RawRule {
    fn from(rule: &Rule) -> Self {
        RawRule {
            min: Value::from(rule.min.minor()),
            max: rule
                .max
                .map_or(Value::Null, |max| Value::from(max.minor())),
            kind: Value::from(rule.kind.as_str()),
            // String keeps the decimal exact.
            value: Value::from(rule.value.to_string()),
        }
    }
}

// =============================================================================
// Field Coercion
// =============================================================================

/// Significant digits a percentage keeps, the most a JSON float carries
/// through storage unchanged.
pub const PERCENT_SIGNIFICANT_DIGITS: u32 = 15;

/// Reads a number out of untyped data.
///
/// Accepts JSON numbers and numeric strings (trimmed, `,` separators
/// removed, plain or scientific notation). Everything else is `None`.
/// Finite numbers outside the decimal range saturate.
fn coerce_decimal(raw: &Value) -> Option<Decimal> {
    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', ""),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .or_else(|| saturating_decimal(&text))
}

fn saturating_decimal(text: &str) -> Option<Decimal> {
    let n = text.parse::<f64>().ok().filter(|n| n.is_finite())?;
    if n.abs() < 1.0 {
        return Some(Decimal::from_f64(n).unwrap_or(Decimal::ZERO));
    }
    Some(Decimal::from_f64(n).unwrap_or(if n > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    }))
}

fn normalize_money(amount: Money, unit: RoundingUnit) -> Money {
    amount.clamp_non_negative().round_to_unit(unit)
}

/// Clamps, floors and rounds a decimal amount. Amounts beyond `i64`
/// saturate.
fn money_from_decimal(amount: Decimal, unit: RoundingUnit) -> Money {
    let whole = amount.max(Decimal::ZERO).floor().to_i64().unwrap_or(i64::MAX);
    normalize_money(Money::from_minor(whole), unit)
}

fn normalize_value(value: Decimal, kind: RuleKind, unit: RoundingUnit) -> Decimal {
    match kind {
        RuleKind::Fixed => Decimal::from(money_from_decimal(value, unit).minor()),
        RuleKind::Percent => {
            let value = value.max(Decimal::ZERO);
            value
                .round_sf(PERCENT_SIGNIFICANT_DIGITS)
                .unwrap_or(value)
                .normalize()
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Converts a raw rule into canonical form.
///
/// | Field | Fallback | Otherwise |
/// |-------|----------|-----------|
/// | `min` | 0 | clamp ≥ 0, floor, round to unit |
/// | `max` | unbounded (null, blank, non-numeric) | clamp ≥ 0, floor, round to unit |
/// | `kind` | fixed | "percent" → percent |
/// | `value` | 0 | clamp ≥ 0; fixed: floor + round, percent: 15 significant digits |
///
/// ## Example
/// ```rust
/// use pricecalc_core::money::RoundingUnit;
/// use pricecalc_core::rule::{normalize_rule, RawRule, RuleKind};
///
/// let raw = RawRule::new("15,150", "", "percent", "3.5");
/// let rule = normalize_rule(&raw, RoundingUnit::default());
///
/// assert_eq!(rule.min.minor(), 15_100);
/// assert_eq!(rule.max, None);
/// assert_eq!(rule.kind, RuleKind::Percent);
/// assert_eq!(rule.value.to_string(), "3.5");
/// ```
pub fn normalize_rule(raw: &RawRule, unit: RoundingUnit) -> Rule {
    let kind = RuleKind::from_raw(&raw.kind);
    Rule {
        min: coerce_decimal(&raw.min)
            .map(|min| money_from_decimal(min, unit))
            .unwrap_or_default(),
        max: coerce_decimal(&raw.max).map(|max| money_from_decimal(max, unit)),
        kind,
        value: normalize_value(
            coerce_decimal(&raw.value).unwrap_or(Decimal::ZERO),
            kind,
            unit,
        ),
    }
}

/// Checks a canonical rule: `max` unbounded or `max >= min`.
#[inline]
pub fn is_valid(rule: &Rule) -> bool {
    rule.is_valid()
}

/// Normalizes every raw rule and drops the invalid ones, keeping order.
pub fn normalize_rules(raws: &[RawRule], unit: RoundingUnit) -> Vec<Rule> {
    raws.iter()
        .map(|raw| normalize_rule(raw, unit))
        .filter(Rule::is_valid)
        .collect()
}

// =============================================================================
// Default Schedule
// =============================================================================

/// The built-in schedule used on first start and after a reset.
///
/// ```text
///   10,000 ~  15,000   1,000원
///   15,100 ~  30,000   1,500원
///   30,100 ~  70,000   2,000원
///   70,100 ~ 100,000   2,500원
///  100,000 ~ ∞         3%
/// ```
///
/// 100,000 sits in both of the last two tiers; the fixed tier comes first
/// and wins.
pub fn default_schedule() -> Vec<RawRule> {
    let tier = |min: i64, max: Option<i64>, kind: &str, value: i64| RawRule {
        min: Value::from(min),
        max: max.map_or(Value::Null, Value::from),
        kind: Value::from(kind),
        value: Value::from(value),
    };

    vec![
        tier(10_000, Some(15_000), "fixed", 1_000),
        tier(15_100, Some(30_000), "fixed", 1_500),
        tier(30_100, Some(70_000), "fixed", 2_000),
        tier(70_100, Some(100_000), "fixed", 2_500),
        tier(100_000, None, "percent", 3),
    ]
}

/// The default schedule, normalized for `unit`.
pub fn default_rules(unit: RoundingUnit) -> Vec<Rule> {
    normalize_rules(&default_schedule(), unit)
}

// =============================================================================
// Unit Tests
// =============================================================================
