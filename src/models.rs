// Core data structures for the dashboard transforms
//
// Two layers live here: `*Payload` types that deserialize the endpoint JSON
// as loosely as it is served, and the validated value types the analytics
// consume. `TryFrom<payload>` is the only place contract violations surface.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analytics::error::{ContractError, ContractResult};

/// Economic or social metric (GDP, population, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub name: String,
    pub unit: String,
}

/// City identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
}

/// One yearly observation; `value` is `None` when the source has no data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(year: i32, value: Option<f64>) -> Self {
        Self { year, value }
    }
}

/// Year-ordered observations for one (city, indicator) pair
///
/// Years are strictly increasing but may be sparse. Construct through
/// [`ValueSeries::new`] or [`ValueSeries::from_map`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueSeries {
    observations: Vec<Observation>,
}

impl ValueSeries {
    /// Validate and wrap a list of observations
    ///
    /// # Errors
    /// `NonIncreasingYears` if years are not strictly increasing, `NonFinite`
    /// if a present value is NaN or infinite.
    pub fn new(observations: Vec<Observation>) -> ContractResult<Self> {
        for pair in observations.windows(2) {
            if pair[1].year <= pair[0].year {
                return Err(ContractError::NonIncreasingYears {
                    field: "values",
                    previous: pair[0].year,
                    next: pair[1].year,
                });
            }
        }
        if let Some(bad) = observations
            .iter()
            .find(|o| o.value.is_some_and(|v| !v.is_finite()))
        {
            return Err(ContractError::NonFinite {
                field: "values",
                year: bad.year,
            });
        }
        Ok(Self { observations })
    }

    /// Build from a year-keyed map (already ordered by `BTreeMap`)
    pub fn from_map(values: &BTreeMap<i32, Option<f64>>) -> ContractResult<Self> {
        Self::new(
            values
                .iter()
                .map(|(&year, &value)| Observation::new(year, value))
                .collect(),
        )
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations with `start <= year <= end`
    pub fn in_range(&self, range: YearRange) -> impl Iterator<Item = &Observation> + '_ {
        self.observations
            .iter()
            .filter(move |o| range.contains(o.year))
    }

    /// Smallest and largest year, if any observation exists
    pub fn span(&self) -> Option<YearRange> {
        let first = self.observations.first()?;
        let last = self.observations.last()?;
        Some(YearRange {
            start: first.year,
            end: last.year,
        })
    }
}

/// Closed year interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// # Errors
    /// `InvalidRange` when `start > end`.
    pub fn new(start: i32, end: i32) -> ContractResult<Self> {
        if start > end {
            return Err(ContractError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

// ============================================================================
// Comparison endpoint
// ============================================================================

/// Server-side aggregates that may accompany a comparison row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedAggregates {
    #[serde(default)]
    pub avg_value: Option<f64>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub latest_value: Option<f64>,
    #[serde(default)]
    pub growth_rate: Option<f64>,
}

/// One city row of the comparison response
#[derive(Debug, Clone, Deserialize)]
pub struct CityComparisonPayload {
    pub city_id: i64,
    pub city_name: String,
    #[serde(default)]
    pub values: BTreeMap<i32, Option<f64>>,
    #[serde(default)]
    pub avg_value: Option<f64>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub latest_value: Option<f64>,
    #[serde(default)]
    pub growth_rate: Option<f64>,
}

/// One indicator block of the comparison response
#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonPayload {
    pub indicator_id: i64,
    pub indicator_name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub cities: Vec<CityComparisonPayload>,
}

/// Validated per-city values for one indicator
#[derive(Debug, Clone, PartialEq)]
pub struct CityValues {
    pub city: City,
    pub series: ValueSeries,
    pub reported: ReportedAggregates,
}

/// Validated comparison block
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorComparison {
    pub indicator: Indicator,
    pub cities: Vec<CityValues>,
}

impl TryFrom<CityComparisonPayload> for CityValues {
    type Error = ContractError;

    fn try_from(payload: CityComparisonPayload) -> ContractResult<Self> {
        Ok(Self {
            series: ValueSeries::from_map(&payload.values)?,
            city: City {
                id: payload.city_id,
                name: payload.city_name,
            },
            reported: ReportedAggregates {
                avg_value: payload.avg_value,
                min_value: payload.min_value,
                max_value: payload.max_value,
                latest_value: payload.latest_value,
                growth_rate: payload.growth_rate,
            },
        })
    }
}

impl TryFrom<ComparisonPayload> for IndicatorComparison {
    type Error = ContractError;

    fn try_from(payload: ComparisonPayload) -> ContractResult<Self> {
        let cities = payload
            .cities
            .into_iter()
            .map(CityValues::try_from)
            .collect::<ContractResult<Vec<_>>>()?;

        Ok(Self {
            indicator: Indicator {
                id: payload.indicator_id,
                name: payload.indicator_name,
                unit: payload.unit,
            },
            cities,
        })
    }
}

// ============================================================================
// Correlation endpoint
// ============================================================================

/// Raw correlation entry as served
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationPayload {
    pub indicator_1: String,
    pub indicator_2: String,
    pub correlation: f64,
    pub p_value: f64,
    #[serde(default)]
    pub strength: String,
}

/// Validated pairwise correlation
///
/// The label is the upstream strength bucket and is passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPair {
    pub indicator_a: String,
    pub indicator_b: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub strength_label: String,
}

impl CorrelationPair {
    /// Build a pair directly, validating the numeric ranges
    pub fn new(
        indicator_a: impl Into<String>,
        indicator_b: impl Into<String>,
        coefficient: f64,
        p_value: f64,
        strength_label: impl Into<String>,
    ) -> ContractResult<Self> {
        let indicator_a = indicator_a.into();
        let indicator_b = indicator_b.into();
        if indicator_a.is_empty() || indicator_b.is_empty() {
            return Err(ContractError::EmptyIndicatorName);
        }
        check_unit_range("correlation", coefficient, -1.0, 1.0)?;
        check_unit_range("p_value", p_value, 0.0, 1.0)?;

        Ok(Self {
            indicator_a,
            indicator_b,
            coefficient,
            p_value,
            strength_label: strength_label.into(),
        })
    }
}

impl TryFrom<CorrelationPayload> for CorrelationPair {
    type Error = ContractError;

    fn try_from(payload: CorrelationPayload) -> ContractResult<Self> {
        Self::new(
            payload.indicator_1,
            payload.indicator_2,
            payload.correlation,
            payload.p_value,
            payload.strength,
        )
    }
}

fn check_unit_range(field: &'static str, value: f64, min: f64, max: f64) -> ContractResult<()> {
    // NaN fails the range check as well
    if !(min..=max).contains(&value) {
        return Err(ContractError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

// ============================================================================
// Prediction endpoints
// ============================================================================

/// One forecast year with its confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub year: i32,
    pub predicted_value: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
}

/// Forecasting backend that produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    Arima,
    Ensemble,
    Other,
}

impl ModelKind {
    /// Map the endpoint's `model_type` string
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "linear" | "linear_regression" => Self::Linear,
            "arima" => Self::Arima,
            "ensemble" => Self::Ensemble,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Arima => "arima",
            Self::Ensemble => "ensemble",
            Self::Other => "other",
        }
    }
}

/// Raw prediction response
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionPayload {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub indicator: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub predictions: Vec<PredictionPoint>,
    #[serde(default)]
    pub accuracy: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub training_years: Vec<i32>,
    #[serde(default)]
    pub training_values: Vec<f64>,
}

/// Validated training window plus forecast horizon
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSeries {
    pub city: String,
    pub indicator: String,
    pub unit: String,
    pub model_type: String,
    pub model_kind: ModelKind,
    pub training_years: Vec<i32>,
    pub training_values: Vec<f64>,
    pub predictions: Vec<PredictionPoint>,
    /// Opaque accuracy metrics (r_squared, mse, aic, nested per-model maps)
    pub accuracy: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<PredictionPayload> for PredictionSeries {
    type Error = ContractError;

    fn try_from(payload: PredictionPayload) -> ContractResult<Self> {
        if payload.training_years.len() != payload.training_values.len() {
            return Err(ContractError::LengthMismatch {
                left: "training_years",
                left_len: payload.training_years.len(),
                right: "training_values",
                right_len: payload.training_values.len(),
            });
        }

        check_increasing("training_years", payload.training_years.iter().copied())?;
        check_increasing("predictions", payload.predictions.iter().map(|p| p.year))?;

        if let (Some(&last), Some(first)) =
            (payload.training_years.last(), payload.predictions.first())
        {
            if first.year <= last {
                return Err(ContractError::ForecastOverlapsTraining {
                    last_training: last,
                    first_forecast: first.year,
                });
            }
        }

        if let Some((&year, _)) = payload
            .training_years
            .iter()
            .zip(&payload.training_values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ContractError::NonFinite {
                field: "training_values",
                year,
            });
        }

        if let Some(point) = payload.predictions.iter().find(|p| {
            !(p.predicted_value.is_finite()
                && p.confidence_lower.is_finite()
                && p.confidence_upper.is_finite())
        }) {
            return Err(ContractError::NonFinite {
                field: "predictions",
                year: point.year,
            });
        }

        Ok(Self {
            model_kind: ModelKind::parse(&payload.model_type),
            city: payload.city,
            indicator: payload.indicator,
            unit: payload.unit,
            model_type: payload.model_type,
            training_years: payload.training_years,
            training_values: payload.training_values,
            predictions: payload.predictions,
            accuracy: payload.accuracy,
        })
    }
}

fn check_increasing(field: &'static str, years: impl Iterator<Item = i32>) -> ContractResult<()> {
    let mut previous: Option<i32> = None;
    for next in years {
        if let Some(prev) = previous {
            if next <= prev {
                return Err(ContractError::NonIncreasingYears {
                    field,
                    previous: prev,
                    next,
                });
            }
        }
        previous = Some(next);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_rejects_unordered_years() {
        let err = ValueSeries::new(vec![
            Observation::new(2021, Some(1.0)),
            Observation::new(2020, Some(2.0)),
        ])
        .unwrap_err();
        assert!(matches!(err, ContractError::NonIncreasingYears { .. }));
    }

    #[test]
    fn test_series_rejects_nan() {
        let err = ValueSeries::new(vec![Observation::new(2020, Some(f64::NAN))]).unwrap_err();
        assert_eq!(
            err,
            ContractError::NonFinite {
                field: "values",
                year: 2020
            }
        );
    }

    #[test]
    fn test_year_range() {
        assert!(YearRange::new(2022, 2020).is_err());
        let range = YearRange::new(2020, 2022).unwrap();
        assert!(range.contains(2020));
        assert!(range.contains(2022));
        assert!(!range.contains(2023));
    }

    #[test]
    fn test_model_kind_parse() {
        assert_eq!(ModelKind::parse("linear_regression"), ModelKind::Linear);
        assert_eq!(ModelKind::parse("ARIMA"), ModelKind::Arima);
        assert_eq!(ModelKind::parse("ensemble"), ModelKind::Ensemble);
        assert_eq!(ModelKind::parse("scenario_simulation"), ModelKind::Other);
    }

    #[test]
    fn test_comparison_payload_keeps_nulls() {
        let json = r#"{
            "indicator_id": 1,
            "indicator_name": "GDP",
            "unit": "bn",
            "cities": [{
                "city_id": 2,
                "city_name": "Wuhan",
                "values": {"2020": 100.0, "2021": null, "2022": 121.0},
                "growth_rate": 21.0
            }]
        }"#;
        let payload: ComparisonPayload = serde_json::from_str(json).unwrap();
        let comparison = IndicatorComparison::try_from(payload).unwrap();

        let row = &comparison.cities[0];
        assert_eq!(row.series.len(), 3);
        assert_eq!(row.series.observations()[1], Observation::new(2021, None));
        assert_eq!(row.reported.growth_rate, Some(21.0));
        assert_eq!(row.reported.avg_value, None);
    }

    #[test]
    fn test_correlation_out_of_range() {
        let err = CorrelationPair::new("GDP", "Population", 1.5, 0.01, "strong").unwrap_err();
        assert!(matches!(
            err,
            ContractError::OutOfRange {
                field: "correlation",
                ..
            }
        ));
        assert!(CorrelationPair::new("GDP", "", 0.5, 0.01, "").is_err());
        assert!(CorrelationPair::new("GDP", "CPI", 0.5, f64::NAN, "").is_err());
    }

    #[test]
    fn test_prediction_length_mismatch() {
        let payload = PredictionPayload {
            city: "Wuhan".into(),
            indicator: "GDP".into(),
            unit: "bn".into(),
            model_type: "linear_regression".into(),
            predictions: vec![],
            accuracy: Default::default(),
            training_years: vec![2020, 2021],
            training_values: vec![1.0],
        };
        let err = PredictionSeries::try_from(payload).unwrap_err();
        assert!(matches!(err, ContractError::LengthMismatch { .. }));
    }

    #[test]
    fn test_prediction_overlap_rejected() {
        let payload = PredictionPayload {
            city: String::new(),
            indicator: String::new(),
            unit: String::new(),
            model_type: "arima".into(),
            predictions: vec![PredictionPoint {
                year: 2021,
                predicted_value: 3.0,
                confidence_lower: 2.0,
                confidence_upper: 4.0,
            }],
            accuracy: Default::default(),
            training_years: vec![2020, 2021],
            training_values: vec![1.0, 2.0],
        };
        let err = PredictionSeries::try_from(payload).unwrap_err();
        assert_eq!(
            err,
            ContractError::ForecastOverlapsTraining {
                last_training: 2021,
                first_forecast: 2021
            }
        );
    }
}
