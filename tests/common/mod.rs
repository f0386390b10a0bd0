//! Common test utilities

use citydash::input;
use citydash::models::{CorrelationPair, IndicatorComparison, PredictionSeries};

/// Comparison response with a missing year and a stale server growth figure
pub const COMPARISON_JSON: &str = r#"[
  {
    "indicator_id": 1,
    "indicator_name": "GDP",
    "unit": "100M CNY",
    "cities": [
      {
        "city_id": 1,
        "city_name": "Wuhan",
        "values": {"2020": 100.0, "2021": null, "2022": 121.0},
        "avg_value": 110.5,
        "min_value": 100.0,
        "max_value": 121.0,
        "latest_value": 121.0,
        "growth_rate": 21.0
      },
      {
        "city_id": 2,
        "city_name": "Yichang",
        "values": {"2020": 0.0, "2021": 40.0, "2022": 44.0}
      }
    ]
  }
]"#;

/// Correlation response listing each pair in one direction only
pub const CORRELATION_JSON: &str = r#"[
  {"indicator_1": "GDP", "indicator_2": "Population", "correlation": 0.73, "p_value": 0.01, "strength": "moderate"},
  {"indicator_1": "Trade", "indicator_2": "GDP", "correlation": 0.91, "p_value": 0.001, "strength": "strong"},
  {"indicator_1": "Population", "indicator_2": "Trade", "correlation": -0.22, "p_value": 0.4, "strength": "negligible"}
]"#;

/// Linear prediction response with three training years and two forecast years
pub const PREDICTION_JSON: &str = r#"{
  "city": "Wuhan",
  "indicator": "GDP",
  "unit": "100M CNY",
  "model_type": "linear_regression",
  "predictions": [
    {"year": 2025, "predicted_value": 40.0, "confidence_lower": 35.0, "confidence_upper": 45.0},
    {"year": 2026, "predicted_value": 50.0, "confidence_lower": 42.0, "confidence_upper": 58.0}
  ],
  "accuracy": {"r_squared": 0.98, "mse": 1.25},
  "training_years": [2022, 2023, 2024],
  "training_values": [10.0, 20.0, 30.0]
}"#;

pub fn comparison() -> Vec<IndicatorComparison> {
    input::parse_comparison(COMPARISON_JSON).unwrap()
}

pub fn correlation_pairs() -> Vec<CorrelationPair> {
    input::parse_correlation(CORRELATION_JSON).unwrap()
}

pub fn prediction() -> PredictionSeries {
    input::parse_prediction(PREDICTION_JSON).unwrap()
}
