//! # pricecalc-app: Calculator Session for the UI Host
//!
//! The layer a browser (or any other) UI host talks to. It wires
//! configuration, logging, persistence and the pricing core into one owned
//! [`Calculator`] whose methods return ready-to-render views.
//!
//! ## Module Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        pricecalc-app                                    │
//! │                                                                         │
//! │  lib.rs (this file)                                                     │
//! │  ├── init_tracing()     - Structured logging setup                      │
//! │  └── open()             - Config → FileStore → Calculator               │
//! │                                                                         │
//! │  config.rs              - CalculatorConfig (TOML + environment)         │
//! │  session.rs             - Calculator, CalculatorView, RuleRow           │
//! │  error.rs               - ConfigError, ApiError                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging                                                  │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info, pricecalc crates at debug; RUST_LOG overrides      │
//! │                                                                         │
//! │  2. Load Configuration                                                  │
//! │     • defaults → calculator.toml → PRICECALC_* environment              │
//! │                                                                         │
//! │  3. Open Rule Storage                                                   │
//! │     • <data dir>/priceCalcRulesV1.json                                  │
//! │     • missing or broken → default schedule                              │
//! │                                                                         │
//! │  4. Hand the Calculator to the UI host                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pricecalc_app::config::CalculatorConfig;
//! use pricecalc_app::open;
//!
//! let dir = std::env::temp_dir().join("pricecalc-doc");
//! let mut config = CalculatorConfig::default();
//! config.storage.dir = Some(dir);
//!
//! let mut calculator = open(&config).unwrap();
//! calculator.set_competitor_price("150,000");
//! let view = calculator.set_cost_price("100,000");
//! assert_eq!(view.display.margin_text, "45,500원");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::CalculatorConfig;
pub use error::{ApiError, ApiResult, ConfigError, ErrorCode};
pub use pricecalc_core::schedule::RuleEdit;
pub use session::{Calculator, CalculatorView, RuleRow};

use pricecalc_store::{FileStore, RuleStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pricecalc_store=trace` - Trace the store only
/// - Default: INFO, pricecalc crates at DEBUG
///
/// Calling it again is harmless; only the first call installs a subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pricecalc=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Opens a file-backed calculator session as configured.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a non-positive rounding unit
/// - `CONFIG_ERROR` when no storage directory is configured and the
///   platform has none
/// - `STORAGE_ERROR` when the storage directory cannot be created
pub fn open(config: &CalculatorConfig) -> ApiResult<Calculator<FileStore>> {
    let unit = config.rounding_unit()?;
    let dir = config.storage_dir().ok_or_else(|| {
        ApiError::new(ErrorCode::ConfigError, "No storage directory available")
    })?;

    info!(dir = %dir.display(), key = %config.storage.key, unit = unit.get(), "Opening rule storage");
    let files = FileStore::new(dir);
    files.ensure_dir()?;
    let store = RuleStore::with_key(files, config.storage.key.clone(), unit);

    Ok(Calculator::new(store, config.currency_format()))
}
