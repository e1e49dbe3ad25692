//! Cumulative distribution functions over a discrete support
//!
//! A sample vector is an unnormalized density: index = position on the
//! support, value = non-negative mass. Normalizing it yields a [`Cdf`] whose
//! cumulative values are strictly increasing, which is what the generalized
//! inverse in [`crate::quantile`] needs.
//!
//! Zero-mass entries carry no probability, so they are folded into their
//! nearest preceding non-zero neighbor (a leading run of zeros is folded
//! forward into the first non-zero entry). Folding zero mass leaves every
//! neighbor's mass unchanged, so the reduced support is exactly the set of
//! non-zero entries, each kept at its original position.

use serde::{Deserialize, Serialize};

use crate::error::{validation, BarycenterError, BarycenterResult};

/// Normalized position of support index `i` on an `n`-point support.
///
/// Positions run over `(0, 1]` as `(i + 1) / n`, matching the default
/// probability levels when `k = n`.
pub fn support_position(i: usize, n: usize) -> f64 {
    (i + 1) as f64 / n as f64
}

/// Cumulative distribution function sampled on a (possibly reduced) support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cdf {
    /// Normalized support positions, strictly increasing
    positions: Vec<f64>,
    /// Cumulative probability at each position, ending at 1
    values: Vec<f64>,
    /// Length of the support before zero-mass entries were folded
    support_len: usize,
}

impl Cdf {
    /// Build a CDF from explicit positions and cumulative values.
    ///
    /// Values must lie in [0, 1] and be non-decreasing; positions must be
    /// strictly increasing.
    pub fn from_parts(positions: Vec<f64>, values: Vec<f64>) -> BarycenterResult<Self> {
        validation::validate_same_len("cdf values", positions.len(), values.len())?;
        if positions.is_empty() {
            return Err(BarycenterError::DegenerateInput);
        }
        validation::validate_finite("cdf position", &positions)?;
        validation::validate_non_negative("cdf value", &values)?;
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v > 1.0) {
            return Err(BarycenterError::InvalidValue {
                what: "cdf value",
                index,
                value,
            });
        }
        if let Some(index) = values.windows(2).position(|w| w[1] < w[0]) {
            return Err(BarycenterError::InvalidValue {
                what: "cdf value",
                index: index + 1,
                value: values[index + 1],
            });
        }
        if let Some(index) = positions.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BarycenterError::InvalidValue {
                what: "cdf position",
                index: index + 1,
                value: positions[index + 1],
            });
        }

        let support_len = positions.len();
        Ok(Self {
            positions,
            values,
            support_len,
        })
    }

    /// Evaluate the CDF at a normalized position.
    ///
    /// Step-function lookup: returns the cumulative value of the last
    /// support point at or before `x`, or 0 before the first one.
    pub fn evaluate(&self, x: f64) -> f64 {
        let idx = self.positions.partition_point(|&p| p <= x);
        if idx == 0 {
            0.0
        } else {
            self.values[idx - 1]
        }
    }

    /// Number of retained support points
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the CDF has no support points
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Support length of the sample the CDF was built from
    pub fn support_len(&self) -> usize {
        self.support_len
    }

    /// Normalized positions of the retained support points
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Cumulative values at each retained support point
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Normalize a non-negative sample vector into a CDF.
///
/// Fails with [`BarycenterError::DegenerateInput`] when the vector is empty or
/// sums to zero, and with [`BarycenterError::InvalidValue`] on a negative or
/// non-finite entry.
pub fn normalize(sample: &[f64]) -> BarycenterResult<Cdf> {
    validation::validate_non_negative("sample", sample)?;

    let total: f64 = sample.iter().sum();
    if total <= 0.0 {
        return Err(BarycenterError::DegenerateInput);
    }

    let n = sample.len();
    let mut positions = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    let mut running = 0.0;

    for (i, &mass) in sample.iter().enumerate() {
        running += mass;
        if mass > 0.0 {
            positions.push(support_position(i, n));
            values.push(running / total);
        }
    }

    // Same summation order as `total`, but pin it against rounding anyway
    if let Some(last) = values.last_mut() {
        *last = 1.0;
    }

    Ok(Cdf {
        positions,
        values,
        support_len: n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        let cdf = normalize(&[1.0, 1.0, 2.0]).unwrap();

        assert_eq!(cdf.len(), 3);
        assert_eq!(cdf.support_len(), 3);
        assert!((cdf.values()[0] - 0.25).abs() < 1e-12);
        assert!((cdf.values()[1] - 0.5).abs() < 1e-12);
        assert_eq!(cdf.values()[2], 1.0);
        assert!((cdf.positions()[0] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(cdf.positions()[2], 1.0);
    }

    #[test]
    fn test_normalize_folds_interior_zeros() {
        let cdf = normalize(&[2.0, 0.0, 0.0, 2.0]).unwrap();

        // Zeros at indices 1 and 2 carry no mass; their support points vanish
        assert_eq!(cdf.len(), 2);
        assert_eq!(cdf.support_len(), 4);
        assert_eq!(cdf.positions(), &[0.25, 1.0]);
        assert_eq!(cdf.values(), &[0.5, 1.0]);
    }

    #[test]
    fn test_normalize_folds_leading_zeros_forward() {
        let cdf = normalize(&[0.0, 0.0, 3.0, 1.0]).unwrap();

        assert_eq!(cdf.positions(), &[0.75, 1.0]);
        assert!((cdf.values()[0] - 0.75).abs() < 1e-12);
        assert_eq!(cdf.evaluate(0.5), 0.0);
    }

    #[test]
    fn test_normalize_strictly_increasing() {
        let cdf = normalize(&[0.0, 1.0, 0.0, 3.0, 0.0, 0.0, 2.0, 0.0]).unwrap();
        assert!(cdf.values().windows(2).all(|w| w[1] > w[0]));
        assert!(cdf.positions().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_normalize_rejects_all_zero() {
        assert_eq!(
            normalize(&[0.0, 0.0, 0.0]),
            Err(BarycenterError::DegenerateInput)
        );
        assert_eq!(normalize(&[]), Err(BarycenterError::DegenerateInput));
    }

    #[test]
    fn test_normalize_rejects_negative() {
        assert!(matches!(
            normalize(&[1.0, -1.0]),
            Err(BarycenterError::InvalidValue { index: 1, .. })
        ));
    }

    #[test]
    fn test_evaluate_steps() {
        let cdf = normalize(&[1.0, 1.0, 1.0, 1.0]).unwrap();

        assert_eq!(cdf.evaluate(0.0), 0.0);
        assert_eq!(cdf.evaluate(0.25), 0.25);
        assert_eq!(cdf.evaluate(0.6), 0.5);
        assert_eq!(cdf.evaluate(2.0), 1.0);
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(Cdf::from_parts(vec![0.5, 1.0], vec![0.3, 1.0]).is_ok());
        assert!(Cdf::from_parts(vec![0.5, 1.0], vec![0.3]).is_err());
        assert!(Cdf::from_parts(vec![0.5, 1.0], vec![0.7, 0.3]).is_err());
        assert!(Cdf::from_parts(vec![1.0, 0.5], vec![0.3, 1.0]).is_err());
        assert!(Cdf::from_parts(vec![0.5, 1.0], vec![0.3, 1.2]).is_err());
    }
}
