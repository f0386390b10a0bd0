use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use citydash::analytics::{growth, naive, prediction};
use citydash::analytics::{NaiveDiagnostic, PredictionChart};
use citydash::input;

/// Parameters for the predict command
pub struct PredictParams {
    pub input: Option<PathBuf>,
    pub with_diagnostic: bool,
    pub pretty: bool,
}

#[derive(Serialize)]
struct PredictionReport {
    chart: PredictionChart,
    /// Percent growth of each forecast year over the year before it
    step_growth: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<NaiveDiagnostic>,
}

pub fn predict(params: PredictParams) -> Result<()> {
    let raw = input::read_source(params.input.as_deref())?;
    let series = input::parse_prediction(&raw).context("Prediction response rejected")?;

    tracing::info!(
        city = %series.city,
        indicator = %series.indicator,
        model = series.model_kind.as_str(),
        training = series.training_values.len(),
        horizon = series.predictions.len(),
        "Composing prediction chart"
    );

    let diagnostic = params.with_diagnostic.then(|| naive::diagnose(&series));
    if let Some(diag) = &diagnostic {
        tracing::debug!(
            mean_residual = ?diag.mean_residual(),
            label = diag.label,
            "Naive diagnostic computed"
        );
    }

    let report = PredictionReport {
        step_growth: growth::forecast_step_growth(&series.training_values, &series.predictions),
        chart: prediction::compose(&series),
        diagnostic,
    };
    super::write_output(&report, params.pretty)
}
