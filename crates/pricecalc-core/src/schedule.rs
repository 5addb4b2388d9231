//! # Rule Schedule
//!
//! The ordered, editable list of rules behind the rule editor.
//!
//! ## Editor Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Rule Schedule Operations                             │
//! │                                                                         │
//! │  Editor Action            Schedule Call           Change                │
//! │  ─────────────            ─────────────           ──────                │
//! │                                                                         │
//! │  Type in a field ────────► edit(i, RuleEdit) ───► rules[i] re-normalized│
//! │                                                                         │
//! │  Click ▲ / ▼ ────────────► move_up / move_down ─► swap with neighbour  │
//! │                                                                         │
//! │  Click Delete ───────────► remove(i) ───────────► rules.remove(i)      │
//! │                                                                         │
//! │  Click Add ──────────────► push_blank() ────────► {0, ∞, fixed, 0}     │
//! │                                                                         │
//! │  Click Reset ────────────► replace(defaults) ───► whole list swapped   │
//! │                                                                         │
//! │  NOTE: Order is priority. The first matching rule wins.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The schedule may hold invalid rules (max below min) while the user is
//! still typing. They are skipped by the matcher and dropped on save.

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::money::RoundingUnit;
use crate::rule::{normalize_rule, RawRule, Rule};

// =============================================================================
// Rule Edit
// =============================================================================

/// A single field edit coming from the rule editor, as typed.
///
/// Hosts send it as `{"field": "max", "text": ""}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", content = "text", rename_all = "lowercase")]
pub enum RuleEdit {
    Min(String),
    /// An empty string clears the upper bound.
    Max(String),
    Kind(String),
    Value(String),
}

impl RuleEdit {
    fn apply_to(self, raw: &mut RawRule) {
        match self {
            RuleEdit::Min(text) => raw.min = text.into(),
            RuleEdit::Max(text) => raw.max = text.into(),
            RuleEdit::Kind(text) => raw.kind = text.into(),
            RuleEdit::Value(text) => raw.value = text.into(),
        }
    }
}

// =============================================================================
// Rule Schedule
// =============================================================================

/// Ordered list of canonical rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSchedule {
    rules: Vec<Rule>,
}

impl RuleSchedule {
    /// Creates a schedule from already normalized rules.
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSchedule { rules }
    }

    /// Returns the rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index < self.rules.len() {
            Ok(())
        } else {
            Err(CoreError::RuleNotFound {
                index,
                len: self.rules.len(),
            })
        }
    }

    /// Replaces one field of a rule and re-normalizes it.
    ///
    /// ## Behavior
    /// - Unparsable text falls back like any raw field (min/value → 0,
    ///   max → unbounded)
    /// - Changing the kind re-normalizes the value under the new kind, so a
    ///   3% rule switched to fixed becomes a 0 deduction at unit 100
    ///
    /// ## Example
    /// ```rust
    /// use pricecalc_core::money::RoundingUnit;
    /// use pricecalc_core::rule::default_rules;
    /// use pricecalc_core::schedule::{RuleEdit, RuleSchedule};
    ///
    /// let unit = RoundingUnit::default();
    /// let mut schedule = RuleSchedule::new(default_rules(unit));
    ///
    /// let rule = schedule.edit(0, RuleEdit::Max(String::new()), unit).unwrap();
    /// assert_eq!(rule.max, None);
    /// ```
    pub fn edit(&mut self, index: usize, edit: RuleEdit, unit: RoundingUnit) -> CoreResult<&Rule> {
        self.check_index(index)?;

        let mut raw = RawRule::from(&self.rules[index]);
        edit.apply_to(&mut raw);
        self.rules[index] = normalize_rule(&raw, unit);

        Ok(&self.rules[index])
    }

    /// Swaps a rule with the one above it.
    ///
    /// Returns `false` without changing anything for the first rule.
    pub fn move_up(&mut self, index: usize) -> CoreResult<bool> {
        self.check_index(index)?;
        if index == 0 {
            return Ok(false);
        }
        self.rules.swap(index - 1, index);
        Ok(true)
    }

    /// Swaps a rule with the one below it.
    ///
    /// Returns `false` without changing anything for the last rule.
    pub fn move_down(&mut self, index: usize) -> CoreResult<bool> {
        self.check_index(index)?;
        if index + 1 == self.rules.len() {
            return Ok(false);
        }
        self.rules.swap(index, index + 1);
        Ok(true)
    }

    /// Removes and returns a rule.
    pub fn remove(&mut self, index: usize) -> CoreResult<Rule> {
        self.check_index(index)?;
        Ok(self.rules.remove(index))
    }

    /// Appends `{0, unbounded, fixed, 0}` and returns its index.
    pub fn push_blank(&mut self) -> usize {
        self.rules.push(Rule::blank());
        self.rules.len() - 1
    }

    /// Swaps in a whole new list (load, reset).
    pub fn replace(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    /// Re-normalizes every rule in place, e.g. after a rounding unit change.
    pub fn renormalize(&mut self, unit: RoundingUnit) {
        for rule in &mut self.rules {
            *rule = rule.normalized(unit);
        }
    }

    /// Returns only the rules that can match.
    pub fn valid_rules(&self) -> Vec<Rule> {
        self.rules.iter().filter(|r| r.is_valid()).cloned().collect()
    }
}

impl From<Vec<Rule>> for RuleSchedule {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSchedule::new(rules)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::rule::{default_rules, RuleKind};
    use rust_decimal::Decimal;

    fn unit() -> RoundingUnit {
        RoundingUnit::default()
    }

    fn schedule() -> RuleSchedule {
        RuleSchedule::new(default_rules(unit()))
    }

    #[test]
    fn test_edit_min_normalizes() {
        let mut s = schedule();
        let rule = s.edit(0, RuleEdit::Min("9,950".into()), unit()).unwrap();
        assert_eq!(rule.min, Money::from_minor(9_900));
    }

    #[test]
    fn test_edit_max_blank_is_unbounded() {
        let mut s = schedule();
        s.edit(1, RuleEdit::Max("".into()), unit()).unwrap();
        assert_eq!(s.get(1).unwrap().max, None);

        s.edit(1, RuleEdit::Max("not a number".into()), unit()).unwrap();
        assert_eq!(s.get(1).unwrap().max, None);
    }

    #[test]
    fn test_edit_can_leave_rule_invalid() {
        let mut s = schedule();
        // Typing "20000" digit by digit passes through "2".
        s.edit(0, RuleEdit::Max("2".into()), unit()).unwrap();
        assert_eq!(s.len(), 5);
        assert!(!s.get(0).unwrap().is_valid());
        assert_eq!(s.valid_rules().len(), 4);

        s.edit(0, RuleEdit::Max("20000".into()), unit()).unwrap();
        assert!(s.get(0).unwrap().is_valid());
    }

    #[test]
    fn test_edit_kind_renormalizes_value() {
        let mut s = schedule();
        let rule = s.edit(4, RuleEdit::Kind("fixed".into()), unit()).unwrap();
        assert_eq!(rule.kind, RuleKind::Fixed);
        assert_eq!(rule.value, Decimal::ZERO);

        let rule = s.edit(0, RuleEdit::Kind("percent".into()), unit()).unwrap();
        assert_eq!(rule.kind, RuleKind::Percent);
        assert_eq!(rule.value, Decimal::from(1_000));
    }

    #[test]
    fn test_edit_value() {
        let mut s = schedule();
        let rule = s.edit(4, RuleEdit::Value("2.5".into()), unit()).unwrap();
        assert_eq!(rule.value, Decimal::new(25, 1));

        let rule = s.edit(0, RuleEdit::Value("1,250".into()), unit()).unwrap();
        assert_eq!(rule.value, Decimal::from(1_200));
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut s = schedule();
        let err = s.edit(9, RuleEdit::Min("0".into()), unit()).unwrap_err();
        assert_eq!(err, CoreError::RuleNotFound { index: 9, len: 5 });
    }

    #[test]
    fn test_move_up_and_down() {
        let mut s = schedule();
        let first = s.get(0).cloned().unwrap();
        let second = s.get(1).cloned().unwrap();

        assert!(s.move_up(1).unwrap());
        assert_eq!(s.get(0), Some(&second));
        assert_eq!(s.get(1), Some(&first));

        assert!(s.move_down(0).unwrap());
        assert_eq!(s.get(0), Some(&first));
    }

    #[test]
    fn test_move_at_edges_is_noop() {
        let mut s = schedule();
        let before = s.clone();
        assert!(!s.move_up(0).unwrap());
        assert!(!s.move_down(4).unwrap());
        assert_eq!(s, before);

        assert!(s.move_down(5).is_err());
    }

    #[test]
    fn test_remove_and_push_blank() {
        let mut s = schedule();
        let removed = s.remove(4).unwrap();
        assert_eq!(removed.kind, RuleKind::Percent);
        assert_eq!(s.len(), 4);

        let index = s.push_blank();
        assert_eq!(index, 4);
        assert_eq!(s.get(4), Some(&Rule::blank()));

        assert!(s.remove(10).is_err());
    }

    #[test]
    fn test_remove_everything() {
        let mut s = schedule();
        while !s.is_empty() {
            s.remove(0).unwrap();
        }
        assert!(s.move_up(0).is_err());
    }

    #[test]
    fn test_edit_from_json() {
        let edit: RuleEdit = serde_json::from_str(r#"{"field": "max", "text": ""}"#).unwrap();
        assert_eq!(edit, RuleEdit::Max(String::new()));

        let edit: RuleEdit = serde_json::from_str(r#"{"field": "kind", "text": "percent"}"#).unwrap();
        assert_eq!(edit, RuleEdit::Kind("percent".into()));
    }

    #[test]
    fn test_renormalize_with_coarser_unit() {
        let mut s = schedule();
        s.renormalize(RoundingUnit::new(1_000).unwrap());
        assert_eq!(s.get(1).unwrap().min, Money::from_minor(15_000));
        assert_eq!(s.get(1).unwrap().value, Decimal::from(1_000));
    }
}
