//! Boundary contract errors
//!
//! Raised once, when a loosely shaped endpoint payload is converted into the
//! validated value types in [`crate::models`]. The transforms themselves never
//! fail; degenerate numeric input resolves to `None` instead.

use thiserror::Error;

/// Upstream payload violated the shape the transforms rely on
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("Mismatched lengths: {left} has {left_len} entries, {right} has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("Years in {field} must be strictly increasing: {previous} followed by {next}")]
    NonIncreasingYears {
        field: &'static str,
        previous: i32,
        next: i32,
    },

    #[error("Forecast year {first_forecast} does not follow last training year {last_training}")]
    ForecastOverlapsTraining {
        last_training: i32,
        first_forecast: i32,
    },

    #[error("Non-finite value in {field} at year {year}")]
    NonFinite { field: &'static str, year: i32 },

    #[error("Value {value} for {field} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid year range: start {start} is after end {end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("Empty indicator name in correlation pair")]
    EmptyIndicatorName,
}

/// Result type for boundary conversions
pub type ContractResult<T> = Result<T, ContractError>;
