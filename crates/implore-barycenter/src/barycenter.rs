//! Quantile-averaged barycenter of several distributions
//!
//! Each input row is normalized into a CDF, sampled as a quantile function at
//! common probability levels, and the quantile functions are aggregated
//! level by level. The aggregate is inverted back into a CDF on the same
//! level grid and differenced into a density.
//!
//! Averaging quantile functions is the one-dimensional Wasserstein
//! barycenter: shapes are averaged along the position axis instead of being
//! blurred by averaging densities directly.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AggregationMethod};
use crate::cdf::normalize;
use crate::error::{validation, BarycenterError, BarycenterResult};
use crate::quantile::{default_levels, to_cdf, to_quantile};

/// Averaged distribution on the probability-level grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barycenter {
    /// Presentation axis: support positions rescaled by the sampling rate
    pub positions: Vec<f64>,
    /// Probability levels the quantile functions were sampled at
    pub levels: Vec<f64>,
    /// Barycenter CDF evaluated at each level's normalized position
    pub cdf: Vec<f64>,
    /// Finite-difference density of `cdf` per grid step
    pub density: Vec<f64>,
}

impl Barycenter {
    /// Number of grid points
    pub fn len(&self) -> usize {
        self.cdf.len()
    }

    /// Check if the grid is empty
    pub fn is_empty(&self) -> bool {
        self.cdf.is_empty()
    }

    /// Grid index of the density peak (first one on ties)
    pub fn peak_index(&self) -> Option<usize> {
        self.density
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &d)| match best {
                Some((_, b)) if b >= d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }
}

/// Compute the barycenter of `distributions`.
///
/// All rows must share one support length. `num_levels` defaults to that
/// length. `fps` only rescales [`Barycenter::positions`].
pub fn barycenter(
    distributions: &[Vec<f64>],
    method: AggregationMethod,
    num_levels: Option<usize>,
    fps: f64,
) -> BarycenterResult<Barycenter> {
    let first = distributions.first().ok_or(BarycenterError::EmptyInput)?;
    if !(fps.is_finite() && fps > 0.0) {
        return Err(BarycenterError::InvalidFps(fps));
    }

    let support_len = first.len();
    for row in distributions {
        validation::validate_same_len("distribution support", support_len, row.len())?;
    }

    let k = num_levels.unwrap_or(support_len);
    if k == 0 {
        return Err(BarycenterError::InvalidLevels(
            "number of levels must be positive".to_string(),
        ));
    }
    let levels = default_levels(k);

    let quantiles = distributions
        .iter()
        .map(|row| normalize(row).and_then(|cdf| to_quantile(&cdf, &levels)))
        .collect::<BarycenterResult<Vec<_>>>()?;

    let averaged = aggregate(&quantiles, method)?;
    let cdf = to_cdf(&averaged, &levels, &levels)?;
    let density = gradient(&cdf);

    let scale = support_len as f64 / fps;
    let positions = levels.iter().map(|p| p * scale).collect();

    tracing::debug!(
        "barycenter of {} distributions ({} method, {} levels)",
        distributions.len(),
        method,
        k
    );

    Ok(Barycenter {
        positions,
        levels,
        cdf,
        density,
    })
}

/// Centered finite difference with one-sided differences at the endpoints
pub fn gradient(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![values[0]],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    values[1] - values[0]
                } else if i == n - 1 {
                    values[n - 1] - values[n - 2]
                } else {
                    (values[i + 1] - values[i - 1]) / 2.0
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient() {
        assert_eq!(gradient(&[0.0, 1.0, 4.0, 9.0]), vec![1.0, 2.0, 4.0, 5.0]);
        assert_eq!(gradient(&[1.0]), vec![1.0]);
        assert!(gradient(&[]).is_empty());
    }

    #[test]
    fn test_identical_uniform_copies() {
        let row = vec![1.0; 8];
        let rows = vec![row.clone(), row.clone(), row];

        for method in [AggregationMethod::Mean, AggregationMethod::Median] {
            let bary = barycenter(&rows, method, None, 1.0).unwrap();
            assert_eq!(bary.len(), 8);
            for (c, p) in bary.cdf.iter().zip(&bary.levels) {
                assert!((c - p).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_identical_copies_reproduce_cdf() {
        let row: Vec<f64> = (0..40)
            .map(|i| {
                let t = i as f64 - 15.0;
                (-t * t / 40.0).exp() + 0.01
            })
            .collect();
        let own = normalize(&row).unwrap();
        let rows = vec![row.clone(); 4];

        let bary = barycenter(&rows, AggregationMethod::Mean, None, 1.0).unwrap();
        for (c, x) in bary.cdf.iter().zip(&bary.levels) {
            assert!((c - own.evaluate(*x)).abs() <= 1.0 / 40.0 + 1e-9);
        }
    }

    #[test]
    fn test_point_mass_copies_are_exact() {
        let rows = vec![vec![0.0, 0.0, 0.0, 1.0]; 3];

        let bary = barycenter(&rows, AggregationMethod::Mean, None, 1.0).unwrap();
        assert_eq!(bary.cdf, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(bary.density, vec![0.0, 0.0, 0.5, 1.0]);
        assert_eq!(bary.peak_index(), Some(3));
    }

    #[test]
    fn test_shifted_peaks_average_to_middle() {
        let mut a = vec![0.0; 21];
        let mut b = vec![0.0; 21];
        a[4] = 1.0;
        a[5] = 1.0;
        b[14] = 1.0;
        b[15] = 1.0;

        let bary = barycenter(&[a, b], AggregationMethod::Mean, None, 1.0).unwrap();
        let peak = bary.peak_index().unwrap();
        assert!((8..=11).contains(&peak), "peak at {}", peak);
    }

    #[test]
    fn test_fps_rescales_positions_only() {
        let rows = vec![vec![1.0, 2.0, 3.0, 2.0]];
        let slow = barycenter(&rows, AggregationMethod::Mean, None, 1.0).unwrap();
        let fast = barycenter(&rows, AggregationMethod::Mean, None, 2.0).unwrap();

        assert_eq!(slow.cdf, fast.cdf);
        assert_eq!(slow.density, fast.density);
        assert_eq!(slow.positions[3], 4.0);
        assert_eq!(fast.positions[3], 2.0);
    }

    #[test]
    fn test_custom_level_count() {
        let rows = vec![vec![1.0; 10]];
        let bary = barycenter(&rows, AggregationMethod::Median, Some(5), 1.0).unwrap();
        assert_eq!(bary.levels, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            barycenter(&[], AggregationMethod::Mean, None, 1.0),
            Err(BarycenterError::EmptyInput)
        );
        assert!(matches!(
            barycenter(&[vec![1.0, 1.0], vec![1.0]], AggregationMethod::Mean, None, 1.0),
            Err(BarycenterError::ShapeMismatch { .. })
        ));
        assert_eq!(
            barycenter(&[vec![0.0, 0.0]], AggregationMethod::Mean, None, 1.0),
            Err(BarycenterError::DegenerateInput)
        );
        assert_eq!(
            barycenter(&[vec![1.0]], AggregationMethod::Mean, None, 0.0),
            Err(BarycenterError::InvalidFps(0.0))
        );
        assert!(barycenter(&[vec![1.0]], AggregationMethod::Mean, Some(0), 1.0).is_err());
    }
}
