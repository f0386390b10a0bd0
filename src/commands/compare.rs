use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use citydash::analytics::growth::{self, ComparisonChart, ComparisonEntry, PeriodChange};
use citydash::input;
use citydash::models::{IndicatorComparison, YearRange};

/// Parameters for the compare command
pub struct CompareParams {
    pub input: Option<PathBuf>,
    pub start: Option<i32>,
    pub end: Option<i32>,
    pub tolerance: f64,
    pub pretty: bool,
}

#[derive(Serialize)]
struct CityChanges {
    city: String,
    changes: Vec<PeriodChange>,
}

#[derive(Serialize)]
struct IndicatorReport {
    indicator: String,
    unit: String,
    range: Option<YearRange>,
    entries: Vec<ComparisonEntry>,
    period_changes: Vec<CityChanges>,
    chart: Option<ComparisonChart>,
}

pub fn compare(params: CompareParams) -> Result<()> {
    let raw = input::read_source(params.input.as_deref())?;
    let comparisons = input::parse_comparison(&raw).context("Comparison response rejected")?;

    let mut reports = Vec::with_capacity(comparisons.len());
    for comparison in &comparisons {
        reports.push(report(comparison, &params)?);
    }

    tracing::info!(indicators = reports.len(), "Comparison transformed");
    super::write_output(&reports, params.pretty)
}

fn report(comparison: &IndicatorComparison, params: &CompareParams) -> Result<IndicatorReport> {
    let indicator = &comparison.indicator;
    let span = growth::comparison_span(comparison);

    let range = growth::resolve_range(params.start, params.end, span)
        .with_context(|| format!("Invalid year range for {}", indicator.name))?;
    if range.is_none() {
        tracing::warn!(
            indicator = %indicator.name,
            start = ?params.start,
            end = ?params.end,
            "No year range could be resolved, emitting no entries"
        );
    }

    tracing::debug!(
        indicator = %indicator.name,
        cities = comparison.cities.len(),
        range = ?range,
        "Summarizing comparison"
    );

    let entries: Vec<ComparisonEntry> = match range {
        Some(range) => comparison
            .cities
            .iter()
            .map(|c| {
                let entry = growth::comparison_entry(&c.city, &c.series, range);
                for mismatch in entry.summary.verify(&c.reported, params.tolerance) {
                    tracing::warn!(
                        indicator = %indicator.name,
                        city = %c.city.name,
                        field = mismatch.field,
                        reported = mismatch.reported,
                        computed = ?mismatch.computed,
                        "Server aggregate disagrees with local computation"
                    );
                }
                entry
            })
            .collect(),
        None => Vec::new(),
    };

    let period_changes = comparison
        .cities
        .iter()
        .map(|c| CityChanges {
            city: c.city.name.clone(),
            changes: growth::period_changes(&c.series),
        })
        .collect();

    Ok(IndicatorReport {
        indicator: indicator.name.clone(),
        unit: indicator.unit.clone(),
        range,
        entries,
        period_changes,
        chart: range.map(|r| growth::comparison_chart(comparison, r)),
    })
}
