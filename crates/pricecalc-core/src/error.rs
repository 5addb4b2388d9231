//! # Error Types
//!
//! Domain-specific error types for pricecalc-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pricecalc-core errors (this file)                                     │
//! │  ├── CoreError        - Rule schedule editing failures                 │
//! │  └── ValidationError  - Invalid settings (rounding unit, keys)         │
//! │                                                                         │
//! │  pricecalc-store errors (separate crate)                               │
//! │  └── StoreError       - Storage read/write failures                    │
//! │                                                                         │
//! │  calculator app errors                                                 │
//! │  └── ApiError         - What the UI host sees (serialized)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Malformed rule data and unparsable prices are NOT errors here: they are
//! normalized away or reported as an unavailable quote.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Rule schedule errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A rule index outside the schedule was addressed.
    ///
    /// ## When This Occurs
    /// - The UI host edits a row that was deleted in the meantime
    /// - Reorder requests with a stale index
    #[error("Rule {index} not found (schedule has {len} rules)")]
    RuleNotFound { index: usize, len: usize },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Settings validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::RuleNotFound { index: 7, len: 5 };
        assert_eq!(err.to_string(), "Rule 7 not found (schedule has 5 rules)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "rounding_unit".to_string(),
        };
        assert_eq!(err.to_string(), "rounding_unit must be positive");

        let err = ValidationError::Required {
            field: "storage key".to_string(),
        };
        assert_eq!(err.to_string(), "storage key is required");
    }
}
