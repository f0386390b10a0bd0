//! Analytics-to-visualization transforms
//!
//! Four independent, pure transforms, each turning one endpoint response into
//! chart or table data. None of them hold state, so they can be re-run on
//! every filter change.

pub mod correlation;
pub mod error;
pub mod growth;
pub mod naive;
pub mod prediction;

pub use correlation::{CorrelationMatrix, DiagonalPolicy, StrengthBucket};
pub use error::{ContractError, ContractResult};
pub use growth::{
    AggregateMismatch, ComparisonChart, ComparisonEntry, GrowthTrend, PeriodChange, RangeSummary,
};
pub use naive::{NaiveDiagnostic, DIAGNOSTIC_LABEL};
pub use prediction::PredictionChart;
