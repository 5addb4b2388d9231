//! # Rule Store
//!
//! Loads and saves the rule schedule under one storage key.
//!
//! ## Load Fallbacks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load()                                                                 │
//! │     │                                                                   │
//! │     ├── read fails ──────────────────────────┐                          │
//! │     ├── key absent / blank ──────────────────┤                          │
//! │     ├── not JSON ────────────────────────────┤                          │
//! │     ├── JSON but not an array ───────────────┼──► default_rules(unit)   │
//! │     ├── array, nothing valid after filter ───┘                          │
//! │     │                                                                   │
//! │     └── otherwise ──► normalized rules, invalid ones dropped            │
//! │                                                                         │
//! │  Loading never fails. Problems are logged at WARN.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pricecalc_core::money::RoundingUnit;
use pricecalc_core::rule::{default_rules, normalize_rules, RawRule, Rule};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::kv::KeyValueStore;
use crate::DEFAULT_STORAGE_KEY;

/// Rule schedule persistence over a [`KeyValueStore`].
#[derive(Debug)]
pub struct RuleStore<S> {
    storage: S,
    key: String,
    unit: RoundingUnit,
}

impl<S: KeyValueStore> RuleStore<S> {
    /// Creates a store using [`DEFAULT_STORAGE_KEY`].
    pub fn new(storage: S, unit: RoundingUnit) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY, unit)
    }

    pub fn with_key(storage: S, key: impl Into<String>, unit: RoundingUnit) -> Self {
        RuleStore {
            storage,
            key: key.into(),
            unit,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn unit(&self) -> RoundingUnit {
        self.unit
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Returns the persisted schedule, or the defaults when there is no
    /// usable one.
    pub fn load(&self) -> Vec<Rule> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                debug!(key = %self.key, "No stored rules, using defaults");
                return default_rules(self.unit);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read rules, using defaults");
                return default_rules(self.unit);
            }
        };

        let raws = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items.into_iter().map(RawRule::from).collect::<Vec<_>>(),
            Ok(_) => {
                warn!(key = %self.key, "Stored rules are not a list, using defaults");
                return default_rules(self.unit);
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored rules are not valid JSON, using defaults");
                return default_rules(self.unit);
            }
        };

        let rules = normalize_rules(&raws, self.unit);
        if rules.is_empty() {
            warn!(
                key = %self.key,
                stored = raws.len(),
                "No valid stored rules, using defaults"
            );
            return default_rules(self.unit);
        }

        if rules.len() < raws.len() {
            debug!(dropped = raws.len() - rules.len(), "Dropped invalid stored rules");
        }
        debug!(key = %self.key, count = rules.len(), "Loaded rules");
        rules
    }

    /// Normalizes, drops invalid rules and overwrites the stored list.
    ///
    /// Returns exactly what was persisted.
    pub fn save(&mut self, rules: &[Rule]) -> StoreResult<Vec<Rule>> {
        let cleaned: Vec<Rule> = rules
            .iter()
            .map(|rule| rule.normalized(self.unit))
            .filter(Rule::is_valid)
            .collect();

        let json = serde_json::to_string(&cleaned)?;
        self.storage.set(&self.key, &json)?;

        debug!(
            key = %self.key,
            saved = cleaned.len(),
            dropped = rules.len() - cleaned.len(),
            "Saved rules"
        );
        Ok(cleaned)
    }

    /// Persists and returns the default schedule.
    pub fn reset(&mut self) -> StoreResult<Vec<Rule>> {
        info!(key = %self.key, "Resetting rules to defaults");
        self.save(&default_rules(self.unit))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
