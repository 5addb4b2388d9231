//! # pricecalc-store: Rule Persistence
//!
//! Keeps the rule schedule in one entry of a key-value store, the way a
//! browser keeps it in `localStorage`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pricecalc Data Flow                              │
//! │                                                                         │
//! │  Calculator session (edit, reorder, reset)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  pricecalc-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────────┐        ┌──────────────────────────┐ │   │
//! │  │   │  RuleStore (rules.rs)│        │  KeyValueStore (kv.rs)   │ │   │
//! │  │   │                      │        │                          │ │   │
//! │  │   │  load  → defaults on │───────►│  MemoryStore  (HashMap)  │ │   │
//! │  │   │          any failure │        │  FileStore    (<key>.json│ │   │
//! │  │   │  save  → full write  │        │                in a dir) │ │   │
//! │  │   │  reset → defaults    │        │                          │ │   │
//! │  │   └──────────────────────┘        └──────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/pricecalc/priceCalcRulesV1.json                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`kv`] - Key-value storage trait and implementations
//! - [`rules`] - Rule load/save/reset on top of a key-value store
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust
//! use pricecalc_core::money::RoundingUnit;
//! use pricecalc_store::{MemoryStore, RuleStore};
//!
//! let mut store = RuleStore::new(MemoryStore::new(), RoundingUnit::default());
//!
//! // Nothing stored yet: the default schedule
//! let rules = store.load();
//! assert_eq!(rules.len(), 5);
//!
//! store.save(&rules[..2]).unwrap();
//! assert_eq!(store.load().len(), 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kv;
pub mod rules;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use rules::RuleStore;

/// Storage key of the rule schedule.
///
/// The version suffix changes if the persisted format ever changes
/// incompatibly.
pub const DEFAULT_STORAGE_KEY: &str = "priceCalcRulesV1";
