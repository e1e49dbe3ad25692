//! Pointwise aggregation of several sampled functions
//!
//! Provides the two aggregation rules for quantile averaging:
//! - Mean (the Wasserstein barycenter of the inputs)
//! - Median (robust against a few outlying distributions)

use serde::{Deserialize, Serialize};

use crate::error::{validation, BarycenterError, BarycenterResult};

/// How quantile functions are combined level by level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMethod {
    /// Arithmetic mean
    Mean,
    /// Median (mean of the two middle values for an even count)
    Median,
}

impl AggregationMethod {
    /// Combine one non-empty column of values
    pub(crate) fn combine(&self, column: &mut [f64]) -> f64 {
        match self {
            AggregationMethod::Mean => column.iter().sum::<f64>() / column.len() as f64,
            AggregationMethod::Median => median(column),
        }
    }
}

impl std::fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationMethod::Mean => write!(f, "mean"),
            AggregationMethod::Median => write!(f, "median"),
        }
    }
}

/// Median of a non-empty slice (reorders the slice)
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    }
}

/// Aggregate equally long rows column by column.
///
/// Fails with [`BarycenterError::EmptyInput`] when there are no rows and with
/// [`BarycenterError::ShapeMismatch`] when row lengths differ.
pub fn aggregate(rows: &[Vec<f64>], method: AggregationMethod) -> BarycenterResult<Vec<f64>> {
    let first = rows.first().ok_or(BarycenterError::EmptyInput)?;
    let width = first.len();
    for row in rows {
        validation::validate_same_len("aggregated row", width, row.len())?;
    }

    let mut column = Vec::with_capacity(rows.len());
    Ok((0..width)
        .map(|j| {
            column.clear();
            column.extend(rows.iter().map(|row| row[j]));
            method.combine(&mut column)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 6.0]];
        assert_eq!(
            aggregate(&rows, AggregationMethod::Mean).unwrap(),
            vec![2.0, 4.0]
        );
    }

    #[test]
    fn test_median_odd_and_even() {
        let rows = vec![vec![1.0, 9.0], vec![100.0, 1.0], vec![2.0, 5.0]];
        assert_eq!(
            aggregate(&rows, AggregationMethod::Median).unwrap(),
            vec![2.0, 5.0]
        );

        let rows = vec![vec![1.0], vec![4.0], vec![2.0], vec![100.0]];
        assert_eq!(
            aggregate(&rows, AggregationMethod::Median).unwrap(),
            vec![3.0]
        );
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(
            aggregate(&[], AggregationMethod::Mean),
            Err(BarycenterError::EmptyInput)
        );
    }

    #[test]
    fn test_zero_width_rows() {
        // No column is ever combined
        let rows = vec![Vec::new(), Vec::new()];
        for method in [AggregationMethod::Mean, AggregationMethod::Median] {
            assert_eq!(aggregate(&rows, method).unwrap(), Vec::<f64>::new());
        }
    }

    #[test]
    fn test_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            aggregate(&rows, AggregationMethod::Median),
            Err(BarycenterError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_method_serde() {
        let json = serde_json::to_string(&AggregationMethod::Median).unwrap();
        assert_eq!(json, "\"median\"");
        let parsed: AggregationMethod = serde_json::from_str("\"mean\"").unwrap();
        assert_eq!(parsed, AggregationMethod::Mean);
        assert_eq!(AggregationMethod::Mean.to_string(), "mean");
    }
}
