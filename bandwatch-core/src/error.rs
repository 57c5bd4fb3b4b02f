//! Error types for Bandwatch operations

use thiserror::Error;

/// Validation errors raised by the render state machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Cut-off {value} is not one of the selectable options {options:?}")]
    CutoffNotInOptions { value: i64, options: Vec<u8> },

    #[error("Sample value must be finite, got {value}")]
    NonFiniteSample { value: f64 },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid color for {field}: {value} - expected #rrggbb")]
    InvalidColor { field: String, value: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Bandwatch core errors.
#[derive(Debug, Clone, Error)]
pub enum VisError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Bandwatch core operations.
pub type VisResult<T> = Result<T, VisError>;

// =============================================================================
// TESTS
// =============================================================================
