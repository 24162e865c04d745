// src/error.rs

use thiserror::Error;

/// Result type alias for calculator operations.
pub type Result<T> = std::result::Result<T, DealError>;

/// Errors raised outside the numeric core.
///
/// Degenerate numeric states (zero velocity, zero exposure) are never errors;
/// they resolve to well-defined values inside the calculator.
#[derive(Error, Debug)]
pub enum DealError {
    /// A product or parameter field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A scenario arrived with no products.
    #[error("No products provided")]
    EmptyScenario,

    #[error("Scenario '{0}' not found")]
    ScenarioNotFound(String),

    /// Scenario names must be usable as a single file name.
    #[error("Invalid scenario name: '{0}'")]
    InvalidScenarioName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl DealError {
    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
