//! Naive one-step diagnostic over the training window
//!
//! NOT a fitted model. Each year is "predicted" from the previous year by
//! replaying the observed growth damped by [`DAMPING`], and the absolute gap
//! to the actual value is reported as a residual. The output exists only to
//! draw an exploratory error overlay and is typed separately from
//! [`crate::analytics::prediction::PredictionChart`] so the two cannot be
//! mixed up. Any surface showing it should carry [`DIAGNOSTIC_LABEL`].

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::models::PredictionSeries;

/// Growth damping applied to each one-step extrapolation
pub const DAMPING: f64 = 0.95;

/// Display label for anything rendered from this module
pub const DIAGNOSTIC_LABEL: &str = "diagnostic estimate (not a fitted model)";

/// Naive estimates and their residuals, index-aligned with the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NaiveDiagnostic {
    pub label: &'static str,
    pub years: Vec<i32>,
    pub estimates: Vec<f64>,
    pub residuals: Vec<f64>,
}

impl NaiveDiagnostic {
    /// Mean absolute residual, `None` for an empty window
    #[must_use]
    pub fn mean_residual(&self) -> Option<f64> {
        if self.residuals.is_empty() {
            return None;
        }
        Some(self.residuals.iter().mean())
    }
}

/// Damped one-step-lag estimates for `values`
///
/// `estimates[0]` is `values[0]`. When either side of a step is zero the
/// growth is treated as 0 and the estimate repeats the previous value: a zero
/// base would go non-finite, and a zero current value is read as a reporting
/// gap rather than a collapse. A step whose damped estimate overflows falls
/// back the same way, so finite input always yields finite estimates.
#[must_use]
pub fn estimate(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    std::iter::once(first)
        .chain(values.windows(2).map(|pair| {
            let (prev, cur) = (pair[0], pair[1]);
            if prev == 0.0 || cur == 0.0 {
                return prev;
            }
            let observed_growth = (cur - prev) / prev;
            let damped = prev * (1.0 + observed_growth * DAMPING);
            if damped.is_finite() {
                damped
            } else {
                prev
            }
        }))
        .collect()
}

/// Absolute gap between each actual value and its estimate
#[must_use]
pub fn residuals(values: &[f64], estimates: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(estimates)
        .map(|(actual, est)| (actual - est).abs())
        .collect()
}

/// Run the diagnostic over a prediction response's training window
#[must_use]
pub fn diagnose(series: &PredictionSeries) -> NaiveDiagnostic {
    let estimates = estimate(&series.training_values);
    let residuals = residuals(&series.training_values, &estimates);
    NaiveDiagnostic {
        label: DIAGNOSTIC_LABEL,
        years: series.training_years.clone(),
        estimates,
        residuals,
    }
}
