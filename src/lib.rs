//! citydash - Regional economic indicator dashboard transforms
//!
//! Turns comparison, correlation, and prediction endpoint responses into the
//! exact structures the dashboard charts render.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`] - Endpoint payloads and the validated value types
//! - [`analytics`] - Growth math, correlation matrix, forecast composition,
//!   naive error diagnostic
//! - [`input`] - Reading and validating saved endpoint responses
//! - [`config`] - Configuration management and settings
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```
//! use citydash::analytics::correlation;
//! use citydash::models::CorrelationPair;
//!
//! let pairs = vec![CorrelationPair::new("GDP", "Population", 0.73, 0.01, "moderate").unwrap()];
//! let heatmap = correlation::build(&pairs);
//! assert_eq!(heatmap.matrix, vec![vec![0.0, 0.73], vec![0.73, 0.0]]);
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod input;
pub mod models;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{
        correlation, growth, naive, prediction, CorrelationMatrix, DiagonalPolicy,
        NaiveDiagnostic, PredictionChart, RangeSummary,
    };
    pub use crate::config::Config;
    pub use crate::error::{CitydashErrorTrait, ContractError, Error, ErrorCategory, Result};
    pub use crate::models::{
        CorrelationPair, IndicatorComparison, PredictionSeries, ValueSeries, YearRange,
    };
}
