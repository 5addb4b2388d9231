//! # Calculator Session
//!
//! Owns everything the UI host shows: the two price fields, the working
//! rule schedule and the rule store behind it.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  UI Action               Session Method              Side Effects       │
//! │  ─────────               ──────────────              ────────────       │
//! │                                                                         │
//! │  Type competitor price ─► set_competitor_price() ──► recalculate       │
//! │  Type cost price ───────► set_cost_price() ────────► recalculate       │
//! │                                                                         │
//! │  Edit a rule field ─────► edit_rule() ─────────────┐                    │
//! │  Click ▲ / ▼ ───────────► move_rule_up/down() ─────┤                    │
//! │  Click Delete ──────────► delete_rule() ───────────┼─► normalize        │
//! │  Click Add ─────────────► add_rule() ──────────────┤   save (full)      │
//! │  Click Reset ───────────► reset_rules() ───────────┘   recalculate      │
//! │                                                                         │
//! │  Every method returns a fresh CalculatorView.                           │
//! │  A failed save is logged; the in-memory schedule stays authoritative    │
//! │  and the view reports persisted: false.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricecalc_core::format::{CurrencyFormat, QuoteView};
use pricecalc_core::money::RoundingUnit;
use pricecalc_core::pricing::{calculate, Quote};
use pricecalc_core::rule::{default_rules, Rule};
use pricecalc_core::schedule::{RuleEdit, RuleSchedule};
use pricecalc_store::{KeyValueStore, RuleStore};
use serde::Serialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::ApiResult;

// =============================================================================
// Views
// =============================================================================

/// One row of the rule editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RuleRow {
    pub index: usize,
    pub rule: Rule,
    /// False while max is below min. Such rows never match and are not saved.
    pub valid: bool,
    pub description: String,
}

/// Everything the UI host renders after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorView {
    pub rules: Vec<RuleRow>,
    pub quote: Quote,
    pub display: QuoteView,
    /// Whether the last rule change reached storage.
    pub persisted: bool,
}

// =============================================================================
// Calculator
// =============================================================================

/// Explicit, owned calculator state.
#[derive(Debug)]
pub struct Calculator<S> {
    store: RuleStore<S>,
    schedule: RuleSchedule,
    format: CurrencyFormat,
    competitor_input: String,
    cost_input: String,
    persisted: bool,
}

impl<S: KeyValueStore> Calculator<S> {
    /// Creates a session, loading the schedule from `store`.
    pub fn new(store: RuleStore<S>, format: CurrencyFormat) -> Self {
        let rules = store.load();
        info!(key = %store.key(), rules = rules.len(), "Calculator session started");

        Calculator {
            store,
            schedule: RuleSchedule::new(rules),
            format,
            competitor_input: String::new(),
            cost_input: String::new(),
            persisted: true,
        }
    }

    pub fn unit(&self) -> RoundingUnit {
        self.store.unit()
    }

    pub fn rules(&self) -> &[Rule] {
        self.schedule.rules()
    }

    pub fn store(&self) -> &RuleStore<S> {
        &self.store
    }

    pub fn into_store(self) -> RuleStore<S> {
        self.store
    }

    /// Evaluates the current price fields against the schedule.
    pub fn quote(&self) -> Quote {
        calculate(
            self.schedule.rules(),
            &self.competitor_input,
            &self.cost_input,
            self.unit(),
        )
    }

    /// Renders the current state.
    pub fn view(&self) -> CalculatorView {
        let quote = self.quote();
        let rules = self
            .schedule
            .rules()
            .iter()
            .enumerate()
            .map(|(index, rule)| RuleRow {
                index,
                rule: rule.clone(),
                valid: rule.is_valid(),
                description: self.format.describe_rule(rule),
            })
            .collect();

        CalculatorView {
            rules,
            display: QuoteView::render(&quote, &self.format),
            quote,
            persisted: self.persisted,
        }
    }

    // =========================================================================
    // Price Fields
    // =========================================================================

    pub fn set_competitor_price(&mut self, raw: &str) -> CalculatorView {
        self.competitor_input = raw.to_string();
        self.view()
    }

    pub fn set_cost_price(&mut self, raw: &str) -> CalculatorView {
        self.cost_input = raw.to_string();
        self.view()
    }

    // =========================================================================
    // Rule Editing
    // =========================================================================

    /// Applies one field edit to a rule, then saves and recalculates.
    pub fn edit_rule(&mut self, index: usize, edit: RuleEdit) -> ApiResult<CalculatorView> {
        debug!(index, ?edit, "Editing rule");
        self.schedule.edit(index, edit, self.unit())?;
        Ok(self.commit())
    }

    /// Moves a rule one position up. The first rule stays put and nothing
    /// is saved.
    pub fn move_rule_up(&mut self, index: usize) -> ApiResult<CalculatorView> {
        if self.schedule.move_up(index)? {
            debug!(index, "Moved rule up");
            Ok(self.commit())
        } else {
            Ok(self.view())
        }
    }

    /// Moves a rule one position down. The last rule stays put and nothing
    /// is saved.
    pub fn move_rule_down(&mut self, index: usize) -> ApiResult<CalculatorView> {
        if self.schedule.move_down(index)? {
            debug!(index, "Moved rule down");
            Ok(self.commit())
        } else {
            Ok(self.view())
        }
    }

    pub fn delete_rule(&mut self, index: usize) -> ApiResult<CalculatorView> {
        let removed = self.schedule.remove(index)?;
        debug!(index, ?removed, "Deleted rule");
        Ok(self.commit())
    }

    /// Appends a blank `{0, unbounded, fixed, 0}` rule.
    pub fn add_rule(&mut self) -> CalculatorView {
        let index = self.schedule.push_blank();
        debug!(index, "Added blank rule");
        self.commit()
    }

    /// Restores and persists the default schedule.
    pub fn reset_rules(&mut self) -> CalculatorView {
        match self.store.reset() {
            Ok(rules) => {
                self.schedule.replace(rules);
                self.persisted = true;
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist default rules");
                self.schedule.replace(default_rules(self.unit()));
                self.persisted = false;
            }
        }
        self.view()
    }

    /// Normalizes the working schedule, saves it in full and re-renders.
    fn commit(&mut self) -> CalculatorView {
        self.schedule.renormalize(self.unit());

        match self.store.save(self.schedule.rules()) {
            Ok(saved) => {
                if saved.len() < self.schedule.len() {
                    debug!(
                        pending = self.schedule.len() - saved.len(),
                        "Invalid rules kept in the editor but not saved"
                    );
                }
                self.persisted = true;
            }
            Err(e) => {
                warn!(error = %e, "Failed to save rules");
                self.persisted = false;
            }
        }

        self.view()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
