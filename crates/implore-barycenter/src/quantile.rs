//! Quantile functions and their inverse
//!
//! The quantile function is the generalized inverse of a CDF: at probability
//! level p it is the smallest support position x with CDF(x) >= p. Going the
//! other way, the CDF at position x is the largest level whose quantile is
//! <= x. Both directions use the same monotone linear interpolation with the
//! roles of domain and range swapped; only the tie-break differs.

use crate::cdf::Cdf;
use crate::error::{validation, BarycenterError, BarycenterResult};

/// How to resolve an evaluation point that lands on a flat run of the
/// interpolation domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TieBreak {
    /// Use the first knot of the run (quantile direction)
    First,
    /// Use the last knot of the run (CDF direction)
    Last,
}

/// `k` evenly spaced probability levels `i / k` for `i = 1..=k`
pub fn default_levels(k: usize) -> Vec<f64> {
    (1..=k).map(|i| i as f64 / k as f64).collect()
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` must be non-empty, non-decreasing and the same length as `fp`.
/// Outside the domain the nearest endpoint value is returned.
pub(crate) fn interpolate(x: f64, xp: &[f64], fp: &[f64], tie: TieBreak) -> f64 {
    let n = xp.len();
    debug_assert_eq!(n, fp.len());
    if n == 1 {
        return fp[0];
    }

    match tie {
        TieBreak::First => {
            let j = xp.partition_point(|&v| v < x);
            if j == 0 {
                return fp[0];
            }
            if j == n {
                return fp[n - 1];
            }
            if xp[j] == x {
                return fp[j];
            }
            lerp(x, xp[j - 1], xp[j], fp[j - 1], fp[j])
        }
        TieBreak::Last => {
            let j = xp.partition_point(|&v| v <= x);
            if j == 0 {
                return fp[0];
            }
            if j == n || xp[j - 1] == x {
                return fp[j - 1];
            }
            lerp(x, xp[j - 1], xp[j], fp[j - 1], fp[j])
        }
    }
}

// Clamped so rounding never steps past the next knot
fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let y = y0 + (y1 - y0) * (x - x0) / (x1 - x0);
    y.clamp(y0.min(y1), y0.max(y1))
}

/// Sample the quantile function of `cdf` at the given probability levels.
///
/// Returns normalized support positions in (0, 1], one per level.
pub fn to_quantile(cdf: &Cdf, levels: &[f64]) -> BarycenterResult<Vec<f64>> {
    validation::validate_levels(levels)?;
    if cdf.is_empty() {
        return Err(BarycenterError::DegenerateInput);
    }

    Ok(levels
        .iter()
        .map(|&p| interpolate(p, cdf.values(), cdf.positions(), TieBreak::First))
        .collect())
}

/// Invert a sampled quantile function back into CDF values at `positions`.
///
/// `quantile[i]` is the position reached at `levels[i]`; it must be
/// non-decreasing. Positions before `quantile[0]` have no level reaching
/// them and get 0.
pub fn to_cdf(quantile: &[f64], levels: &[f64], positions: &[f64]) -> BarycenterResult<Vec<f64>> {
    validation::validate_levels(levels)?;
    validation::validate_same_len("quantile function", levels.len(), quantile.len())?;
    validation::validate_finite("quantile", quantile)?;
    if let Some(index) = quantile.windows(2).position(|w| w[1] < w[0]) {
        return Err(BarycenterError::InvalidValue {
            what: "quantile",
            index: index + 1,
            value: quantile[index + 1],
        });
    }

    Ok(positions
        .iter()
        .map(|&x| {
            if x < quantile[0] {
                0.0
            } else {
                interpolate(x, quantile, levels, TieBreak::Last)
            }
        })
        .collect())
}
