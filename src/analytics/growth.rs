//! Growth-rate math and range aggregates for city comparisons
//!
//! This module provides:
//! - Range summaries (average, min, max, latest, growth) over present values
//! - Year-over-year percentage change with a trend label
//! - Step growth across a forecast horizon
//! - Grouped-bar chart data for comparing cities on one indicator
//!
//! Absent observations never enter the arithmetic. Degenerate input (no
//! values, a single value, a zero base) yields `None` rather than an error.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeSet;

use crate::analytics::error::ContractResult;
use crate::models::{
    City, IndicatorComparison, PredictionPoint, ReportedAggregates, ValueSeries, YearRange,
};

/// Percentage change from `base` to `current`
///
/// Returns `None` when `base` is exactly zero or the result is not finite.
#[must_use]
pub fn percent_change(base: f64, current: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let change = (current - base) / base * 100.0;
    change.is_finite().then_some(change)
}

/// Aggregates over the present values of a series within a year range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub average: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub latest_value: Option<f64>,
    /// Percent change from the earliest to the latest present value
    pub growth_rate: Option<f64>,
}

/// Summarize `series` over the closed range
///
/// # Returns
/// All fields `None` when the range holds no present value. `growth_rate` is
/// additionally `None` with fewer than two present values or a zero earliest
/// value.
#[must_use]
pub fn summarize(series: &ValueSeries, range: YearRange) -> RangeSummary {
    let present: Vec<f64> = series.in_range(range).filter_map(|o| o.value).collect();

    let (Some(&earliest), Some(&latest)) = (present.first(), present.last()) else {
        return RangeSummary::default();
    };

    let growth_rate = if present.len() >= 2 {
        percent_change(earliest, latest)
    } else {
        None
    };

    RangeSummary {
        average: Some(present.iter().mean()),
        minimum: Some(Statistics::min(present.iter())),
        maximum: Some(Statistics::max(present.iter())),
        latest_value: Some(latest),
        growth_rate,
    }
}

/// A reported aggregate that disagrees with the locally computed one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateMismatch {
    pub field: &'static str,
    pub reported: f64,
    pub computed: Option<f64>,
}

impl RangeSummary {
    /// Compare server-supplied aggregates against this summary
    ///
    /// Fields the server omitted are skipped. `tolerance` is relative to the
    /// larger magnitude (floored at 1.0).
    #[must_use]
    pub fn verify(&self, reported: &ReportedAggregates, tolerance: f64) -> Vec<AggregateMismatch> {
        let checks = [
            ("avg_value", reported.avg_value, self.average),
            ("min_value", reported.min_value, self.minimum),
            ("max_value", reported.max_value, self.maximum),
            ("latest_value", reported.latest_value, self.latest_value),
            ("growth_rate", reported.growth_rate, self.growth_rate),
        ];

        checks
            .into_iter()
            .filter_map(|(field, reported, computed)| {
                let reported = reported?;
                let agrees = computed.is_some_and(|c| {
                    let scale = reported.abs().max(c.abs()).max(1.0);
                    (reported - c).abs() <= tolerance * scale
                });
                (!agrees).then_some(AggregateMismatch {
                    field,
                    reported,
                    computed,
                })
            })
            .collect()
    }
}

/// Direction of a period-over-period change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthTrend {
    Rising,
    Falling,
    Flat,
}

impl GrowthTrend {
    #[must_use]
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            Self::Rising
        } else if change_pct < 0.0 {
            Self::Falling
        } else {
            Self::Flat
        }
    }
}

/// Change between two consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub year: i32,
    pub previous_year: i32,
    pub change_pct: Option<f64>,
    pub trend: Option<GrowthTrend>,
}

/// Percentage change between each observation and the one before it
///
/// Consecutive means adjacent in the series, so sparse years compare across
/// the gap. A missing value on either side, or a zero previous value, gives
/// `None`.
#[must_use]
pub fn period_changes(series: &ValueSeries) -> Vec<PeriodChange> {
    series
        .observations()
        .windows(2)
        .map(|pair| {
            let change_pct = match (pair[0].value, pair[1].value) {
                (Some(prev), Some(cur)) => percent_change(prev, cur),
                _ => None,
            };
            PeriodChange {
                year: pair[1].year,
                previous_year: pair[0].year,
                change_pct,
                trend: change_pct.map(GrowthTrend::from_change),
            }
        })
        .collect()
}

/// Growth of each forecast point over the point before it
///
/// The first forecast point compares against the last training value.
#[must_use]
pub fn forecast_step_growth(
    training_values: &[f64],
    predictions: &[PredictionPoint],
) -> Vec<Option<f64>> {
    let mut previous = training_values.last().copied();
    predictions
        .iter()
        .map(|point| {
            let growth = previous.and_then(|base| percent_change(base, point.predicted_value));
            previous = Some(point.predicted_value);
            growth
        })
        .collect()
}

/// One city's row in a comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub city: City,
    pub range: YearRange,
    pub series: ValueSeries,
    #[serde(flatten)]
    pub summary: RangeSummary,
}

/// Build a comparison row for one city
#[must_use]
pub fn comparison_entry(city: &City, series: &ValueSeries, range: YearRange) -> ComparisonEntry {
    ComparisonEntry {
        city: city.clone(),
        range,
        series: series.clone(),
        summary: summarize(series, range),
    }
}

/// Smallest range covering every city's observations
#[must_use]
pub fn comparison_span(comparison: &IndicatorComparison) -> Option<YearRange> {
    comparison
        .cities
        .iter()
        .filter_map(|c| c.series.span())
        .reduce(|a, b| YearRange {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        })
}

/// Combine optional `start`/`end` bounds with the observed `span`
///
/// Both bounds given wins outright. A single bound takes the other end from
/// the span. No bounds means the span itself. With a single bound and no
/// observations there is nothing to anchor the open end, so the result is
/// `None`.
pub fn resolve_range(
    start: Option<i32>,
    end: Option<i32>,
    span: Option<YearRange>,
) -> ContractResult<Option<YearRange>> {
    let range = match (start, end, span) {
        (Some(start), Some(end), _) => Some(YearRange::new(start, end)?),
        (Some(start), None, Some(span)) => Some(YearRange::new(start, span.end)?),
        (None, Some(end), Some(span)) => Some(YearRange::new(span.start, end)?),
        (None, None, span) => span,
        (Some(_), None, None) | (None, Some(_), None) => None,
    };
    Ok(range)
}

/// Bar values for one city, aligned to [`ComparisonChart::years`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityBars {
    pub city: String,
    pub values: Vec<Option<f64>>,
}

/// Grouped-bar chart: one category per year, one bar series per city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub indicator: String,
    pub unit: String,
    pub years: Vec<i32>,
    pub series: Vec<CityBars>,
}

/// Align every city onto the union of observed years inside `range`
///
/// Years a city lacks, or reports as missing, stay `None`.
#[must_use]
pub fn comparison_chart(comparison: &IndicatorComparison, range: YearRange) -> ComparisonChart {
    let years: Vec<i32> = comparison
        .cities
        .iter()
        .flat_map(|c| c.series.in_range(range).map(|o| o.year))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = comparison
        .cities
        .iter()
        .map(|c| {
            let observations = c.series.observations();
            let values = years
                .iter()
                .map(|year| {
                    observations
                        .binary_search_by_key(year, |o| o.year)
                        .ok()
                        .and_then(|idx| observations[idx].value)
                })
                .collect();
            CityBars {
                city: c.city.name.clone(),
                values,
            }
        })
        .collect();

    ComparisonChart {
        indicator: comparison.indicator.name.clone(),
        unit: comparison.indicator.unit.clone(),
        years,
        series,
    }
}
