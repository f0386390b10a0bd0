//! Correlation matrix assembly for the indicator heatmap
//!
//! The correlation endpoint returns an unordered list of indicator pairs and
//! may omit the reverse direction of a pair. [`build`] turns that list into a
//! dense symmetric matrix plus the flattened cell list a heatmap consumes.
//!
//! # Ordering
//!
//! Rows and columns follow the order in which each indicator name is first
//! seen while scanning the pair list (left name, then right name, pair by
//! pair). The order is never sorted, so the heatmap axes match the order the
//! server reported.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::models::CorrelationPair;

/// How diagonal cells without an explicit self-pair are filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagonalPolicy {
    /// Leave unset self-correlation cells at 0.0
    #[default]
    Zero,

    /// Fill unset self-correlation cells with 1.0
    Unit,
}

impl DiagonalPolicy {
    /// Parse from config / CLI text
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zero" | "0" => Some(Self::Zero),
            "unit" | "one" | "1" => Some(Self::Unit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Unit => "unit",
        }
    }
}

/// Dense symmetric correlation matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Axis labels, first-seen order
    pub indicator_order: Vec<String>,

    /// `matrix[i][j]` is the coefficient between `indicator_order[i]` and `[j]`
    pub matrix: Vec<Vec<f64>>,

    /// Row-major `(row, col, coefficient)` triples
    pub cells: Vec<(usize, usize, f64)>,
}

impl CorrelationMatrix {
    /// Number of distinct indicators
    #[must_use]
    pub fn len(&self) -> usize {
        self.indicator_order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indicator_order.is_empty()
    }

    /// Position of an indicator on both axes
    #[must_use]
    pub fn index_of(&self, indicator: &str) -> Option<usize> {
        self.indicator_order.iter().position(|name| name == indicator)
    }

    /// Coefficient between two indicators by name
    #[must_use]
    pub fn coefficient(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.matrix[i][j])
    }
}

/// Build the matrix with unset diagonal cells left at zero
#[must_use]
pub fn build(pairs: &[CorrelationPair]) -> CorrelationMatrix {
    build_with(pairs, DiagonalPolicy::Zero)
}

/// Build the matrix, filling unset diagonal cells according to `diagonal`
///
/// Every pair writes both `[i][j]` and `[j][i]`, so the result is symmetric
/// whether or not the input lists both directions. When the same pair appears
/// more than once the last occurrence wins. A self-pair in the input always
/// takes precedence over the diagonal policy.
#[must_use]
pub fn build_with(pairs: &[CorrelationPair], diagonal: DiagonalPolicy) -> CorrelationMatrix {
    let mut order: IndexSet<&str> = IndexSet::new();
    for pair in pairs {
        order.insert(pair.indicator_a.as_str());
        order.insert(pair.indicator_b.as_str());
    }

    let n = order.len();
    let mut matrix = vec![vec![0.0; n]; n];
    let mut diagonal_set = vec![false; n];

    for pair in pairs {
        // Both names were inserted above
        let (Some(i), Some(j)) = (
            order.get_index_of(pair.indicator_a.as_str()),
            order.get_index_of(pair.indicator_b.as_str()),
        ) else {
            continue;
        };
        matrix[i][j] = pair.coefficient;
        matrix[j][i] = pair.coefficient;
        if i == j {
            diagonal_set[i] = true;
        }
    }

    if diagonal == DiagonalPolicy::Unit {
        for (i, set) in diagonal_set.iter().enumerate() {
            if !set {
                matrix[i][i] = 1.0;
            }
        }
    }

    let cells = matrix
        .iter()
        .enumerate()
        .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &value)| (i, j, value)))
        .collect();

    CorrelationMatrix {
        indicator_order: order.into_iter().map(str::to_string).collect(),
        matrix,
        cells,
    }
}

/// Correlation strength bucket by coefficient magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthBucket {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl StrengthBucket {
    /// Classify a coefficient by `|r|`
    ///
    /// # Classification
    /// - `|r| >= 0.8`: Strong
    /// - `0.6 <= |r| < 0.8`: Moderate
    /// - `0.4 <= |r| < 0.6`: Weak
    /// - otherwise: Negligible
    #[must_use]
    pub fn from_coefficient(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude >= 0.8 {
            Self::Strong
        } else if magnitude >= 0.6 {
            Self::Moderate
        } else if magnitude >= 0.4 {
            Self::Weak
        } else {
            Self::Negligible
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::Negligible => "negligible",
        }
    }
}

/// Tooltip text for a coefficient, fixed decimals
#[must_use]
pub fn format_coefficient(r: f64, decimals: usize) -> String {
    format!("{r:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str, r: f64) -> CorrelationPair {
        CorrelationPair::new(a, b, r, 0.01, StrengthBucket::from_coefficient(r).as_str()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let result = build(&[]);
        assert!(result.indicator_order.is_empty());
        assert!(result.matrix.is_empty());
        assert!(result.cells.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_pair() {
        let result = build(&[pair("GDP", "Population", 0.73)]);
        assert_eq!(result.indicator_order, vec!["GDP", "Population"]);
        assert_eq!(result.matrix, vec![vec![0.0, 0.73], vec![0.73, 0.0]]);
        assert_eq!(
            result.cells,
            vec![(0, 0, 0.0), (0, 1, 0.73), (1, 0, 0.73), (1, 1, 0.0)]
        );
    }

    #[test]
    fn test_first_seen_order_not_sorted() {
        let result = build(&[
            pair("Trade", "GDP", 0.5),
            pair("GDP", "CPI", -0.2),
            pair("Trade", "CPI", 0.1),
        ]);
        assert_eq!(result.indicator_order, vec!["Trade", "GDP", "CPI"]);
        assert_eq!(result.coefficient("CPI", "GDP"), Some(-0.2));
        assert_eq!(result.coefficient("GDP", "Nope"), None);
    }

    #[test]
    fn test_reverse_pair_not_required() {
        let result = build(&[pair("A", "B", 0.4), pair("B", "C", 0.9)]);
        assert_eq!(result.matrix[1][0], 0.4);
        assert_eq!(result.matrix[2][1], 0.9);
        // A and C never paired
        assert_eq!(result.matrix[0][2], 0.0);
    }

    #[test]
    fn test_diagonal_policy() {
        let pairs = [pair("A", "B", 0.4), pair("B", "B", 0.95)];
        let zero = build_with(&pairs, DiagonalPolicy::Zero);
        assert_eq!(zero.matrix[0][0], 0.0);
        assert_eq!(zero.matrix[1][1], 0.95);

        let unit = build_with(&pairs, DiagonalPolicy::Unit);
        assert_eq!(unit.matrix[0][0], 1.0);
        // explicit self-pair wins
        assert_eq!(unit.matrix[1][1], 0.95);
    }

    #[test]
    fn test_strength_bucket() {
        assert_eq!(StrengthBucket::from_coefficient(-0.85), StrengthBucket::Strong);
        assert_eq!(StrengthBucket::from_coefficient(0.6), StrengthBucket::Moderate);
        assert_eq!(StrengthBucket::from_coefficient(0.45), StrengthBucket::Weak);
        assert_eq!(StrengthBucket::from_coefficient(0.1), StrengthBucket::Negligible);
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(0.734_56, 4), "0.7346");
        assert_eq!(format_coefficient(-0.5, 2), "-0.50");
    }

    #[test]
    fn test_diagonal_policy_parse() {
        assert_eq!(DiagonalPolicy::parse("Unit"), Some(DiagonalPolicy::Unit));
        assert_eq!(DiagonalPolicy::parse("zero"), Some(DiagonalPolicy::Zero));
        assert_eq!(DiagonalPolicy::parse("diag"), None);
    }
}
