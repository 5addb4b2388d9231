//! # Display Formatting
//!
//! Text the UI host puts on screen: amounts with grouping and a currency
//! symbol, rule descriptions, and the rendered result panel.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Deduction     3% (4,500원)                  │
//! │  Expected      145,500원                     │
//! │  Margin        45,500원        (red if < 0)  │
//! │  Rule          100,000 ~ ∞ : 3%              │
//! └──────────────────────────────────────────────┘
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::Quote;
use crate::rule::{Rule, RuleKind};

/// Placeholder shown when no quote is available.
pub const PLACEHOLDER: &str = "-";

/// Rule text when the price falls in no tier.
pub const NO_RULE: &str = "none";

/// Upper bound text of an open-ended rule.
pub const UNBOUNDED: &str = "∞";

// =============================================================================
// Currency Format
// =============================================================================

/// Where the currency symbol goes relative to the digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// "₩12,300"
    Prefix,
    /// "12,300원"
    #[default]
    Suffix,
}

/// How monetary amounts are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    pub group_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "원".to_string(),
            position: SymbolPosition::Suffix,
            group_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// Formats an amount, sign first.
    ///
    /// ## Example
    /// ```rust
    /// use pricecalc_core::format::{CurrencyFormat, SymbolPosition};
    /// use pricecalc_core::money::Money;
    ///
    /// let won = CurrencyFormat::default();
    /// assert_eq!(won.format_money(Money::from_minor(12_300)), "12,300원");
    /// assert_eq!(won.format_money(Money::from_minor(-2_300)), "-2,300원");
    ///
    /// let prefixed = CurrencyFormat {
    ///     symbol: "₩".to_string(),
    ///     position: SymbolPosition::Prefix,
    ///     group_separator: ',',
    /// };
    /// assert_eq!(prefixed.format_money(Money::from_minor(-2_300)), "-₩2,300");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let digits = group_digits(amount.minor().unsigned_abs(), self.group_separator);

        match self.position {
            SymbolPosition::Prefix => format!("{sign}{}{digits}", self.symbol),
            SymbolPosition::Suffix => format!("{sign}{digits}{}", self.symbol),
        }
    }

    /// Describes a rule as `"min ~ max : value"`.
    ///
    /// `"10,000 ~ 15,000 : 1,000원"`, `"100,000 ~ ∞ : 3%"`
    pub fn describe_rule(&self, rule: &Rule) -> String {
        let min = group_digits(rule.min.minor().unsigned_abs(), self.group_separator);
        let max = rule.max.map_or_else(
            || UNBOUNDED.to_string(),
            |max| group_digits(max.minor().unsigned_abs(), self.group_separator),
        );
        let value = match rule.kind {
            RuleKind::Percent => format_percent(rule.value),
            RuleKind::Fixed => {
                let amount = rule.value.trunc().to_i64().unwrap_or(i64::MAX);
                self.format_money(Money::from_minor(amount))
            }
        };
        format!("{min} ~ {max} : {value}")
    }
}

/// Inserts a separator every three digits.
pub fn group_digits(n: u64, separator: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// "3%", "2.5%". Trailing zeros are dropped.
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", percent.normalize())
}

/// [`CurrencyFormat::describe_rule`] with the default format.
pub fn describe_rule(rule: &Rule) -> String {
    CurrencyFormat::default().describe_rule(rule)
}

// =============================================================================
// Quote View
// =============================================================================

/// Rendered result panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub deduction_text: String,
    pub expected_price_text: String,
    pub margin_text: String,
    /// The UI highlights a negative margin.
    pub margin_negative: bool,
    pub rule_text: String,
}

impl QuoteView {
    /// Renders a quote with the given currency format.
    ///
    /// A percent deduction shows the percentage next to the amount:
    /// `"3% (4,500원)"`.
    pub fn render(quote: &Quote, currency: &CurrencyFormat) -> Self {
        let Some(breakdown) = quote.breakdown() else {
            return QuoteView::unavailable();
        };

        let deduction = currency.format_money(breakdown.deduction);
        let deduction_text = match &breakdown.matched_rule {
            Some(rule) if rule.kind == RuleKind::Percent => {
                format!("{} ({deduction})", format_percent(rule.value))
            }
            _ => deduction,
        };

        QuoteView {
            deduction_text,
            expected_price_text: currency.format_money(breakdown.expected_price),
            margin_text: currency.format_money(breakdown.margin),
            margin_negative: breakdown.margin_is_negative(),
            rule_text: breakdown
                .matched_rule
                .as_ref()
                .map_or_else(|| NO_RULE.to_string(), |rule| currency.describe_rule(rule)),
        }
    }

    /// Every text is the placeholder.
    pub fn unavailable() -> Self {
        QuoteView {
            deduction_text: PLACEHOLDER.to_string(),
            expected_price_text: PLACEHOLDER.to_string(),
            margin_text: PLACEHOLDER.to_string(),
            margin_negative: false,
            rule_text: PLACEHOLDER.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::RoundingUnit;
    use crate::pricing::calculate;
    use crate::rule::default_rules;

    fn render(competitor: &str, cost: &str) -> QuoteView {
        let unit = RoundingUnit::default();
        let quote = calculate(&default_rules(unit), competitor, cost, unit);
        QuoteView::render(&quote, &CurrencyFormat::default())
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0, ','), "0");
        assert_eq!(group_digits(999, ','), "999");
        assert_eq!(group_digits(1_000, ','), "1,000");
        assert_eq!(group_digits(12_345, ','), "12,345");
        assert_eq!(group_digits(1_234_567, '.'), "1.234.567");
        assert_eq!(group_digits(u64::MAX, ','), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_format_money() {
        let won = CurrencyFormat::default();
        assert_eq!(won.format_money(Money::from_minor(12_300)), "12,300원");
        assert_eq!(won.format_money(Money::zero()), "0원");
        assert_eq!(won.format_money(Money::from_minor(-2_300)), "-2,300원");
        assert_eq!(
            won.format_money(Money::from_minor(i64::MIN)),
            "-9,223,372,036,854,775,808원"
        );
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Decimal::from(3)), "3%");
        assert_eq!(format_percent(Decimal::new(250, 2)), "2.5%");
    }

    #[test]
    fn test_describe_rule() {
        assert_eq!(
            describe_rule(&Rule::fixed(10_000, Some(15_000), 1_000)),
            "10,000 ~ 15,000 : 1,000원"
        );
        assert_eq!(
            describe_rule(&Rule::percent(100_000, None, Decimal::from(3))),
            "100,000 ~ ∞ : 3%"
        );
    }

    #[test]
    fn test_render_fixed_match() {
        let view = render("12,345", "9,000");
        assert_eq!(view.deduction_text, "1,000원");
        assert_eq!(view.expected_price_text, "11,300원");
        assert_eq!(view.margin_text, "2,300원");
        assert!(!view.margin_negative);
        assert_eq!(view.rule_text, "10,000 ~ 15,000 : 1,000원");
    }

    #[test]
    fn test_render_percent_match() {
        let view = render("150,000", "100,000");
        assert_eq!(view.deduction_text, "3% (4,500원)");
        assert_eq!(view.expected_price_text, "145,500원");
        assert_eq!(view.margin_text, "45,500원");
        assert_eq!(view.rule_text, "100,000 ~ ∞ : 3%");
    }

    #[test]
    fn test_render_negative_margin() {
        let view = render("12,000", "15,000");
        assert_eq!(view.margin_text, "-4,000원");
        assert!(view.margin_negative);
    }

    #[test]
    fn test_render_no_match() {
        let view = render("5,000", "1,000");
        assert_eq!(view.deduction_text, "0원");
        assert_eq!(view.rule_text, NO_RULE);
    }

    #[test]
    fn test_render_unavailable() {
        let view = render("", "1,000");
        assert_eq!(view, QuoteView::unavailable());
        assert_eq!(view.margin_text, "-");
        assert!(!view.margin_negative);
    }
}
