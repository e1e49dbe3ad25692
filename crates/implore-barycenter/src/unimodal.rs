//! Unimodal (rise-then-fall) least-squares regression
//!
//! Finds `y` and a mode index minimizing `sum w[i] * (x[i] - y[i])^2` with `y`
//! non-decreasing on `0..=mode` and non-increasing on `mode..n`.
//!
//! Two pooling passes run in opposite directions. After each point is
//! consumed, a pass knows the optimal monotone error of the prefix (or
//! suffix) ending at that point, and whether the point still stands alone in
//! its block. A point that stands alone in both passes can be the peak: the
//! fit keeps it at its own value and each side is an independent isotonic
//! fit. The mode is the cheapest such point, first one on ties.
//!
//! Each pass is amortized O(n) since every pooling step removes a block for
//! good; the mode search and the reconstruction are O(n) as well.

use serde::{Deserialize, Serialize};

use crate::error::BarycenterResult;
use crate::isotonic::{resolve_weights, PoolingPass, ScanOrder};

/// Result of a unimodal fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnimodalFit {
    /// Fitted values, non-decreasing up to `mode` and non-increasing after
    pub fitted: Vec<f64>,
    /// Index of the peak (0-based)
    pub mode: usize,
    /// Weighted squared error of the fit
    pub error: f64,
}

/// Prefix errors of one pass; `None` where the point was pooled away
fn breakpoint_errors(
    values: &[f64],
    weights: &[f64],
    order: ScanOrder,
) -> BarycenterResult<(Vec<Option<f64>>, f64)> {
    let mut errors = vec![None; values.len()];
    let mut pass = PoolingPass::new(values, weights, order);
    while !pass.is_done() {
        let index = pass.push_next()?;
        if pass.top_is_singleton() {
            errors[index] = Some(pass.error());
        }
    }
    tracing::trace!(
        "{:?} pass pooled {} points into {} blocks",
        order,
        values.len(),
        pass.block_count()
    );
    Ok((errors, pass.error()))
}

/// Replay a pass until `stop` has been consumed and expand its blocks
fn replay(
    values: &[f64],
    weights: &[f64],
    order: ScanOrder,
    stop: usize,
) -> BarycenterResult<Vec<f64>> {
    let mut pass = PoolingPass::new(values, weights, order);
    while !pass.is_done() {
        if pass.push_next()? == stop {
            break;
        }
    }
    Ok(pass.expand())
}

/// Fit the nearest unimodal sequence to `values`.
///
/// Weights default to `1 / n`. Fails on empty input, mismatched or negative
/// weights, non-finite values, and when pooling would divide by a zero
/// aggregate weight.
pub fn fit_unimodal(values: &[f64], weights: Option<&[f64]>) -> BarycenterResult<UnimodalFit> {
    let weights = resolve_weights(values, weights)?;
    let n = values.len();

    let (left, rising_error) = breakpoint_errors(values, &weights, ScanOrder::Forward)?;
    let (right, falling_error) = breakpoint_errors(values, &weights, ScanOrder::Backward)?;

    let mut best: Option<(usize, f64)> = None;
    for (i, (l, r)) in left.iter().zip(&right).enumerate() {
        if let (Some(l), Some(r)) = (l, r) {
            let cost = l + r;
            if best.map_or(true, |(_, b)| cost < b) {
                best = Some((i, cost));
            }
        }
    }

    let fit = match best {
        Some((mode, error)) => {
            let mut fitted = replay(values, &weights, ScanOrder::Forward, mode)?;
            let falling = replay(values, &weights, ScanOrder::Backward, mode)?;
            fitted.extend_from_slice(&falling[1..]);
            UnimodalFit {
                fitted,
                mode,
                error,
            }
        }
        None => {
            // Unreachable for finite input (the first maximum always stands
            // alone in both passes); fall back to the cheaper monotone fit
            tracing::warn!("no interior breakpoint for unimodal fit of {} points", n);
            if falling_error <= rising_error {
                UnimodalFit {
                    fitted: replay(values, &weights, ScanOrder::Backward, 0)?,
                    mode: 0,
                    error: falling_error,
                }
            } else {
                UnimodalFit {
                    fitted: replay(values, &weights, ScanOrder::Forward, n - 1)?,
                    mode: n - 1,
                    error: rising_error,
                }
            }
        }
    };

    tracing::debug!(
        "unimodal fit of {} points: mode {} error {}",
        n,
        fit.mode,
        fit.error
    );
    Ok(fit)
}
