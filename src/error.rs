//! Custom error types for fleetcost
//!
//! The engine prefers graceful degradation (fallback categories, clamped
//! lives, omitted ROI) over errors. The variants here cover the few cases
//! that must surface: structurally invalid equipment, an undefined
//! break-even, and the I/O performed by the thin CLI layer.

use thiserror::Error;

/// The main error type for fleetcost operations
#[derive(Error, Debug)]
pub enum FleetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for input records
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required identification field is missing on an equipment record
    #[error("Equipment '{identifier}' is missing required field '{field}'")]
    MissingField {
        identifier: String,
        field: &'static str,
    },

    /// Break-even cannot be computed without at least one rental rate
    #[error("Break-even is undefined: no daily, weekly or monthly rental rate was provided")]
    BreakEvenUndefined,

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl FleetError {
    /// Create a "missing field" error for an equipment record
    pub fn missing_field(identifier: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            identifier: identifier.into(),
            field,
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MissingField { .. })
    }
}

impl From<std::io::Error> for FleetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for FleetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for fleetcost operations
pub type FleetResult<T> = Result<T, FleetError>;
