//! Property tests for the transforms

use proptest::prelude::*;

use citydash::analytics::{correlation, growth, naive, prediction, DiagonalPolicy};
use citydash::models::{
    CorrelationPair, ModelKind, Observation, PredictionPoint, PredictionSeries, ValueSeries,
    YearRange,
};

fn pair_strategy() -> impl Strategy<Value = CorrelationPair> {
    let names = prop::sample::select(vec!["GDP", "Population", "Trade", "CPI", "Retail"]);
    (names.clone(), names, -1.0f64..=1.0, 0.0f64..=1.0).prop_map(|(a, b, r, p)| {
        CorrelationPair::new(a, b, r, p, "").expect("generated pair is in range")
    })
}

fn series_strategy() -> impl Strategy<Value = ValueSeries> {
    prop::collection::vec(prop::option::of(-1.0e6f64..1.0e6), 0..12).prop_map(|values| {
        let observations = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Observation::new(2000 + i as i32, v))
            .collect();
        ValueSeries::new(observations).expect("years are increasing")
    })
}

proptest! {
    #[test]
    fn matrix_is_symmetric(pairs in prop::collection::vec(pair_strategy(), 0..20)) {
        for policy in [DiagonalPolicy::Zero, DiagonalPolicy::Unit] {
            let heatmap = correlation::build_with(&pairs, policy);
            let n = heatmap.len();
            prop_assert_eq!(heatmap.matrix.len(), n);
            prop_assert_eq!(heatmap.cells.len(), n * n);
            for i in 0..n {
                for j in 0..n {
                    prop_assert_eq!(heatmap.matrix[i][j], heatmap.matrix[j][i]);
                }
            }
        }
    }

    #[test]
    fn matrix_order_is_first_seen(pairs in prop::collection::vec(pair_strategy(), 1..20)) {
        let heatmap = correlation::build(&pairs);
        prop_assert_eq!(&heatmap.indicator_order[0], &pairs[0].indicator_a);
        let mut seen: Vec<&str> = Vec::new();
        for pair in &pairs {
            for name in [pair.indicator_a.as_str(), pair.indicator_b.as_str()] {
                if !seen.contains(&name) {
                    seen.push(name);
                }
            }
        }
        prop_assert_eq!(heatmap.indicator_order.iter().map(String::as_str).collect::<Vec<_>>(), seen);
    }

    #[test]
    fn summary_never_panics_and_stays_finite(series in series_strategy()) {
        let summary = growth::summarize(&series, YearRange { start: 1990, end: 2030 });
        let present = series.observations().iter().filter(|o| o.value.is_some()).count();

        prop_assert_eq!(summary.average.is_some(), present > 0);
        if present < 2 {
            prop_assert!(summary.growth_rate.is_none());
        }
        for v in [summary.average, summary.minimum, summary.maximum, summary.growth_rate].into_iter().flatten() {
            prop_assert!(v.is_finite());
        }
        if let (Some(min), Some(max), Some(avg)) = (summary.minimum, summary.maximum, summary.average) {
            prop_assert!(min <= avg + 1e-6 && avg <= max + 1e-6);
        }
    }

    #[test]
    fn naive_estimates_stay_finite(
        values in prop::collection::vec(
            prop_oneof![
                Just(0.0f64),
                -1.0e6f64..1.0e6,
                -1.0e-9f64..1.0e-9,
                1.0e290f64..1.0e300,
            ],
            0..20,
        )
    ) {
        let estimates = naive::estimate(&values);
        prop_assert_eq!(estimates.len(), values.len());
        prop_assert!(estimates.iter().all(|v| v.is_finite()));
        prop_assert!(naive::residuals(&values, &estimates).iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn composed_series_align(training in prop::collection::vec(-1.0e3f64..1.0e3, 0..8), horizon in 0usize..5) {
        let training_years: Vec<i32> = (0..training.len() as i32).map(|i| 2000 + i).collect();
        let first_forecast = 2000 + training.len() as i32;
        let predictions: Vec<PredictionPoint> = (0..horizon as i32)
            .map(|i| PredictionPoint {
                year: first_forecast + i,
                predicted_value: i as f64,
                confidence_lower: i as f64 - 1.0,
                confidence_upper: i as f64 + 1.0,
            })
            .collect();
        let series = PredictionSeries {
            city: String::new(),
            indicator: String::new(),
            unit: String::new(),
            model_type: String::from("ensemble"),
            model_kind: ModelKind::Ensemble,
            training_years,
            training_values: training.clone(),
            predictions,
            accuracy: Default::default(),
        };

        let chart = prediction::compose(&series);
        let len = training.len() + horizon;
        prop_assert_eq!(chart.years.len(), len);
        prop_assert_eq!(chart.historical.len(), len);
        prop_assert_eq!(chart.forecast.len(), len);
        prop_assert_eq!(chart.confidence_lower.len(), len);
        prop_assert_eq!(chart.confidence_upper.len(), len);

        // band never shows over the training window
        prop_assert!(chart.confidence_lower[..training.len()].iter().all(Option::is_none));
        if let Some(&last) = training.last() {
            prop_assert_eq!(chart.forecast[training.len() - 1], Some(last));
            prop_assert!(chart.forecast[..training.len() - 1].iter().all(Option::is_none));
        }
    }
}
