use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use citydash::analytics::correlation::{self, CorrelationMatrix, DiagonalPolicy, StrengthBucket};
use citydash::input;
use citydash::models::CorrelationPair;

/// Parameters for the correlate command
pub struct CorrelateParams {
    pub input: Option<PathBuf>,
    pub diagonal: DiagonalPolicy,
    pub decimals: usize,
    pub pretty: bool,
}

#[derive(Serialize)]
struct PairRow {
    #[serde(flatten)]
    pair: CorrelationPair,
    bucket: StrengthBucket,
}

#[derive(Serialize)]
struct CorrelationReport {
    #[serde(flatten)]
    heatmap: CorrelationMatrix,
    diagonal: DiagonalPolicy,
    /// Tooltip text per cell, same layout as `matrix`
    labels: Vec<Vec<String>>,
    pairs: Vec<PairRow>,
}

pub fn correlate(params: CorrelateParams) -> Result<()> {
    let raw = input::read_source(params.input.as_deref())?;
    let pairs = input::parse_correlation(&raw).context("Correlation response rejected")?;

    let heatmap = correlation::build_with(&pairs, params.diagonal);
    tracing::info!(
        pairs = pairs.len(),
        indicators = heatmap.len(),
        diagonal = params.diagonal.as_str(),
        "Correlation matrix built"
    );

    let labels = heatmap
        .matrix
        .iter()
        .map(|row| {
            row.iter()
                .map(|&r| correlation::format_coefficient(r, params.decimals))
                .collect()
        })
        .collect();

    let pairs = pairs
        .into_iter()
        .map(|pair| PairRow {
            bucket: StrengthBucket::from_coefficient(pair.coefficient),
            pair,
        })
        .collect();

    let report = CorrelationReport {
        heatmap,
        diagonal: params.diagonal,
        labels,
        pairs,
    };
    super::write_output(&report, params.pretty)
}
