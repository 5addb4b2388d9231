//! # Error Types
//!
//! Configuration errors and the error type the UI host receives.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in pricecalc                              │
//! │                                                                         │
//! │  UI host                     Calculator session                         │
//! │  ───────                     ──────────────────                         │
//! │                                                                         │
//! │  calculator.edit_rule(7, ..)                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Session method → Result<CalculatorView, ApiError>               │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad index? ──────── CoreError::RuleNotFound ────┐              │  │
//! │  │         │                                        ▼              │  │
//! │  │  Storage? ───────── StoreError::Io ───────────► ApiError ──────►│  │
//! │  │         │                                        ▲              │  │
//! │  │  Config? ────────── ConfigError ─────────────────┘              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "NOT_FOUND", "message": "Rule 7 not found (schedule has     │
//! │    5 rules)" }                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use pricecalc_core::{CoreError, ValidationError};
use pricecalc_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Configuration Error
// =============================================================================

/// Errors loading, validating or saving [`CalculatorConfig`](crate::config::CalculatorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("Config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to encode config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A setting is out of range.
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// No explicit path and no platform config directory.
    #[error("No config path available")]
    NoConfigPath,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// API Error
// =============================================================================

/// Error returned from session operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Rule 7 not found (schedule has 5 rules)"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A rule index that does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Reading or writing rule storage failed
    StorageError,

    /// Configuration could not be loaded or is invalid
    ConfigError,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RuleNotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
        }
    }
}

/// Converts storage errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidKey(_) => ApiError::validation(err.to_string()),
            StoreError::Io(ref e) => {
                // Log the actual error but return a generic message
                tracing::error!("Rule storage I/O failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Failed to access rule storage")
            }
            StoreError::Serialization(ref e) => {
                tracing::error!("Rule serialization failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Failed to encode rules")
            }
            StoreError::Unavailable(_) => ApiError::new(ErrorCode::StorageError, err.to_string()),
        }
    }
}

/// Converts configuration errors to API errors.
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(e) => ApiError::validation(e.to_string()),
            other => ApiError::new(ErrorCode::ConfigError, other.to_string()),
        }
    }
}

/// Result type for session operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = ApiError::from(CoreError::RuleNotFound { index: 7, len: 5 });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Rule 7 not found (schedule has 5 rules)");
    }

    #[test]
    fn test_store_error_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ApiError::from(StoreError::Io(io));
        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(err.message, "Failed to access rule storage");

        let err = ApiError::from(StoreError::InvalidKey("a/b".into()));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_config_error_mapping() {
        let err = ApiError::from(ConfigError::Validation(ValidationError::MustBePositive {
            field: "rounding_unit".into(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "rounding_unit must be positive");

        let err = ApiError::from(ConfigError::NoConfigPath);
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_display() {
        let err = ApiError::validation("bad");
        assert_eq!(err.to_string(), "ValidationError: bad");
    }
}
