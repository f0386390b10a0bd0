//! Forecast chart composition
//!
//! Splices a training window and a forecast horizon into aligned plot series
//! on a single year axis. Every series has one slot per axis year; `None`
//! slots are gaps the renderer skips.
//!
//! - `historical` stops at the last training year.
//! - `forecast` repeats the last training value at the last training slot so
//!   the two lines meet without a gap.
//! - `confidence_lower` and `band_fill` form a stacked band (lower as the
//!   baseline, `upper - lower` as the visible fill) over the horizon only.

use serde::Serialize;

use crate::models::{ModelKind, PredictionSeries};

/// Plot-ready forecast chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionChart {
    pub city: String,
    pub indicator: String,
    pub unit: String,
    pub model_type: String,
    pub model_kind: ModelKind,

    /// Category axis: training years followed by forecast years
    pub years: Vec<i32>,
    pub historical: Vec<Option<f64>>,
    pub forecast: Vec<Option<f64>>,
    pub confidence_lower: Vec<Option<f64>>,
    pub confidence_upper: Vec<Option<f64>>,
    pub band_fill: Vec<Option<f64>>,

    pub accuracy: serde_json::Map<String, serde_json::Value>,
}

impl PredictionChart {
    /// Number of axis slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.years.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Compose the chart series for a validated prediction response
///
/// With an empty training window there is nothing to anchor to and the
/// forecast line starts directly at the first predicted value.
#[must_use]
pub fn compose(series: &PredictionSeries) -> PredictionChart {
    let training_len = series.training_values.len();
    let horizon = &series.predictions;
    let gap = || std::iter::repeat(None).take(training_len);

    let years = series
        .training_years
        .iter()
        .copied()
        .chain(horizon.iter().map(|p| p.year))
        .collect();

    let historical = series
        .training_values
        .iter()
        .map(|&v| Some(v))
        .chain(std::iter::repeat(None).take(horizon.len()))
        .collect();

    let mut forecast: Vec<Option<f64>> = gap()
        .chain(horizon.iter().map(|p| Some(p.predicted_value)))
        .collect();
    if let Some(&anchor) = series.training_values.last() {
        forecast[training_len - 1] = Some(anchor);
    }

    let confidence_lower = gap()
        .chain(horizon.iter().map(|p| Some(p.confidence_lower)))
        .collect();
    let confidence_upper = gap()
        .chain(horizon.iter().map(|p| Some(p.confidence_upper)))
        .collect();
    let band_fill = gap()
        .chain(
            horizon
                .iter()
                .map(|p| Some(p.confidence_upper - p.confidence_lower)),
        )
        .collect();

    PredictionChart {
        city: series.city.clone(),
        indicator: series.indicator.clone(),
        unit: series.unit.clone(),
        model_type: series.model_type.clone(),
        model_kind: series.model_kind,
        years,
        historical,
        forecast,
        confidence_lower,
        confidence_upper,
        band_fill,
        accuracy: series.accuracy.clone(),
    }
}
