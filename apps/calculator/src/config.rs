//! # Calculator Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PRICECALC_ROUNDING_UNIT=1000                                       │
//! │     PRICECALC_STORAGE_KEY=priceCalcRulesV1                             │
//! │     PRICECALC_STORAGE_DIR=/var/lib/pricecalc                           │
//! │     PRICECALC_CURRENCY_SYMBOL=원                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pricecalc/calculator.toml (Linux)                        │
//! │     ~/Library/Application Support/com.pricecalc.pricecalc/             │
//! │         calculator.toml (macOS)                                        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     unit 100, key "priceCalcRulesV1", "12,300원"                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # calculator.toml
//! [pricing]
//! rounding_unit = 100
//!
//! [storage]
//! key = "priceCalcRulesV1"
//! dir = "/home/me/.local/share/pricecalc"   # optional
//!
//! [display]
//! currency_symbol = "원"
//! symbol_position = "suffix"   # prefix | suffix
//! group_separator = ","
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use pricecalc_core::format::{CurrencyFormat, SymbolPosition};
use pricecalc_core::money::RoundingUnit;
use pricecalc_core::{ValidationError, DEFAULT_ROUNDING_UNIT};
use pricecalc_store::{FileStore, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Sections
// =============================================================================

/// Pricing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Every amount is truncated to a multiple of this. Must be > 0.
    #[serde(default = "default_rounding_unit")]
    pub rounding_unit: i64,
}

fn default_rounding_unit() -> i64 {
    DEFAULT_ROUNDING_UNIT
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            rounding_unit: default_rounding_unit(),
        }
    }
}

/// Where the rule schedule is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage key of the rule list.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Directory of the file store. Platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            key: default_storage_key(),
            dir: None,
        }
    }
}

/// How amounts are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default)]
    pub symbol_position: SymbolPosition,

    #[serde(default = "default_group_separator")]
    pub group_separator: char,
}

fn default_currency_symbol() -> String {
    "원".to_string()
}

fn default_group_separator() -> char {
    ','
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            symbol_position: SymbolPosition::default(),
            group_separator: default_group_separator(),
        }
    }
}

// =============================================================================
// Calculator Configuration
// =============================================================================

/// Complete calculator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl CalculatorConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (calculator.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load), reading overrides through `lookup`
    /// instead of the process environment.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading calculator config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load calculator config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Calculator config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        RoundingUnit::new(self.pricing.rounding_unit)?;

        if self.storage.key.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "storage.key".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(unit) = lookup("PRICECALC_ROUNDING_UNIT") {
            match unit.trim().parse::<i64>() {
                Ok(unit) => {
                    debug!(unit, "Overriding rounding unit from environment");
                    self.pricing.rounding_unit = unit;
                }
                Err(_) => warn!(value = %unit, "Ignoring non-numeric PRICECALC_ROUNDING_UNIT"),
            }
        }

        if let Some(key) = lookup("PRICECALC_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage.key = key;
        }

        if let Some(dir) = lookup("PRICECALC_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage directory from environment");
            self.storage.dir = Some(PathBuf::from(dir));
        }

        if let Some(symbol) = lookup("PRICECALC_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "pricecalc", "pricecalc")
            .map(|dirs| dirs.config_dir().join("calculator.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the validated rounding unit.
    pub fn rounding_unit(&self) -> ConfigResult<RoundingUnit> {
        Ok(RoundingUnit::new(self.pricing.rounding_unit)?)
    }

    /// Returns the storage directory, falling back to the platform default.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone().or_else(FileStore::default_dir)
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.display.currency_symbol.clone(),
            position: self.display.symbol_position,
            group_separator: self.display.group_separator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config() {
        let config = CalculatorConfig::default();
        assert_eq!(config.pricing.rounding_unit, 100);
        assert_eq!(config.storage.key, "priceCalcRulesV1");
        assert_eq!(config.currency_format(), CurrencyFormat::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = CalculatorConfig::default();

        config.pricing.rounding_unit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(ValidationError::MustBePositive { .. }))
        ));

        config.pricing.rounding_unit = 10;
        config.storage.key = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calculator.toml");
        std::fs::write(
            &path,
            "[pricing]\nrounding_unit = 1000\n\n[display]\nsymbol_position = \"prefix\"\ncurrency_symbol = \"₩\"\n",
        )
        .unwrap();

        let config = CalculatorConfig::load_with(Some(path), no_env).unwrap();
        assert_eq!(config.pricing.rounding_unit, 1_000);
        assert_eq!(config.storage.key, "priceCalcRulesV1");
        assert_eq!(config.display.symbol_position, SymbolPosition::Prefix);
        assert_eq!(config.display.group_separator, ',');
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config =
            CalculatorConfig::load_with(Some(dir.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config, CalculatorConfig::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calculator.toml");
        std::fs::write(&path, "[pricing\nrounding_unit = ").unwrap();

        let err = CalculatorConfig::load_with(Some(path), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_unit_in_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calculator.toml");
        std::fs::write(&path, "[pricing]\nrounding_unit = -5\n").unwrap();

        assert!(CalculatorConfig::load_with(Some(path), no_env).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRICECALC_ROUNDING_UNIT", "10"),
            ("PRICECALC_STORAGE_KEY", "rulesV2"),
            ("PRICECALC_STORAGE_DIR", "/tmp/pricecalc"),
            ("PRICECALC_CURRENCY_SYMBOL", " KRW"),
        ]
        .into_iter()
        .collect();

        let mut config = CalculatorConfig::default();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.pricing.rounding_unit, 10);
        assert_eq!(config.storage.key, "rulesV2");
        assert_eq!(config.storage_dir(), Some(PathBuf::from("/tmp/pricecalc")));
        assert_eq!(config.display.currency_symbol, " KRW");
    }

    #[test]
    fn test_non_numeric_unit_override_is_ignored() {
        let mut config = CalculatorConfig::default();
        config.apply_overrides(|name| {
            (name == "PRICECALC_ROUNDING_UNIT").then(|| "lots".to_string())
        });
        assert_eq!(config.pricing.rounding_unit, 100);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("calculator.toml");

        let mut config = CalculatorConfig::default();
        config.pricing.rounding_unit = 500;
        config.storage.dir = Some(dir.path().join("data"));
        config.save(Some(path.clone())).unwrap();

        let reloaded = CalculatorConfig::load_with(Some(path), no_env).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&CalculatorConfig::default()).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[storage]"));
        assert!(toml_str.contains("[display]"));
        assert!(!toml_str.contains("dir"));
    }
}
