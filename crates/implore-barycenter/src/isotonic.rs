//! Weighted isotonic regression by pooling adjacent violators (PAVA)
//!
//! A pooling pass consumes points one at a time in scan order and keeps a
//! stack of blocks whose representative values are non-decreasing along the
//! scan. When an incoming point would break that order it is pooled into the
//! top block, and pooling continues backward while the merged block still
//! violates the order against the block below it. After every push the stack
//! is the optimal non-decreasing fit of the points consumed so far, so its
//! accumulated error is the prefix error the unimodal mode search needs.
//!
//! Scanning right to left yields a fit that is non-increasing in the original
//! index order; that is how both directions share one implementation.

use serde::{Deserialize, Serialize};

use crate::error::{validation, BarycenterError, BarycenterResult};

/// Monotonicity constraint of an isotonic fit, in original index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// y[i] <= y[i + 1]
    Increasing,
    /// y[i] >= y[i + 1]
    Decreasing,
}

/// Order in which a pooling pass consumes points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanOrder {
    /// Index 0 first
    Forward,
    /// Index n - 1 first
    Backward,
}

/// A maximal run of pooled points
#[derive(Debug, Clone, Copy)]
struct Block {
    /// Weighted mean of the pooled points
    value: f64,
    /// Aggregate weight
    weight: f64,
    /// Number of original points
    len: usize,
    /// Weighted squared error of the pooled points around `value`
    sse: f64,
    /// Error of the whole fit from the first block up to this one
    error: f64,
}

/// Incremental PAVA over a borrowed sequence
pub(crate) struct PoolingPass<'a> {
    values: &'a [f64],
    weights: &'a [f64],
    order: ScanOrder,
    blocks: Vec<Block>,
    pushed: usize,
}

impl<'a> PoolingPass<'a> {
    pub(crate) fn new(values: &'a [f64], weights: &'a [f64], order: ScanOrder) -> Self {
        debug_assert_eq!(values.len(), weights.len());
        Self {
            values,
            weights,
            order,
            blocks: Vec::with_capacity(values.len()),
            pushed: 0,
        }
    }

    /// Original index of the next point to be consumed
    pub(crate) fn next_index(&self) -> usize {
        match self.order {
            ScanOrder::Forward => self.pushed,
            ScanOrder::Backward => self.values.len() - 1 - self.pushed,
        }
    }

    /// Check if every point has been consumed
    pub(crate) fn is_done(&self) -> bool {
        self.pushed == self.values.len()
    }

    /// Consume the next point and restore the block order.
    ///
    /// Returns the original index of the consumed point.
    pub(crate) fn push_next(&mut self) -> BarycenterResult<usize> {
        let index = self.next_index();
        let error = self.error();
        self.blocks.push(Block {
            value: self.values[index],
            weight: self.weights[index],
            len: 1,
            sse: 0.0,
            error,
        });
        self.pushed += 1;

        while self.blocks.len() >= 2 {
            let top = self.blocks[self.blocks.len() - 1];
            let below = self.blocks[self.blocks.len() - 2];
            if top.value >= below.value {
                break;
            }
            self.blocks.truncate(self.blocks.len() - 2);
            let merged = self.pool(below, top, index)?;
            self.blocks.push(merged);
        }

        Ok(index)
    }

    fn pool(&self, a: Block, b: Block, index: usize) -> BarycenterResult<Block> {
        let weight = a.weight + b.weight;
        if weight <= 0.0 {
            return Err(BarycenterError::DegenerateWeight { index });
        }

        let value = (a.weight * a.value + b.weight * b.value) / weight;
        let gap = a.value - b.value;
        let sse = a.sse + b.sse + a.weight * b.weight / weight * gap * gap;

        Ok(Block {
            value,
            weight,
            len: a.len + b.len,
            sse,
            error: self.error() + sse,
        })
    }

    /// Error of the current fit over every consumed point
    pub(crate) fn error(&self) -> f64 {
        self.blocks.last().map_or(0.0, |b| b.error)
    }

    /// Whether the most recent point still stands alone in its block
    pub(crate) fn top_is_singleton(&self) -> bool {
        self.blocks.last().is_some_and(|b| b.len == 1)
    }

    /// Number of blocks on the stack
    pub(crate) fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Expand the blocks into per-point fitted values in original index order
    pub(crate) fn expand(&self) -> Vec<f64> {
        let mut fitted = Vec::with_capacity(self.pushed);
        for block in &self.blocks {
            fitted.extend(std::iter::repeat(block.value).take(block.len));
        }
        if self.order == ScanOrder::Backward {
            fitted.reverse();
        }
        fitted
    }
}

/// Result of an isotonic fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotonicFit {
    /// Fitted values, monotone in the requested direction
    pub fitted: Vec<f64>,
    /// Weighted squared error of the fit
    pub error: f64,
}

/// Resolve optional weights to a validated vector (uniform `1 / n` by default)
pub(crate) fn resolve_weights(values: &[f64], weights: Option<&[f64]>) -> BarycenterResult<Vec<f64>> {
    if values.is_empty() {
        return Err(BarycenterError::EmptyInput);
    }
    validation::validate_finite("value", values)?;

    match weights {
        Some(w) => {
            validation::validate_same_len("weights", values.len(), w.len())?;
            validation::validate_non_negative("weight", w)?;
            Ok(w.to_vec())
        }
        None => Ok(vec![1.0 / values.len() as f64; values.len()]),
    }
}

/// Weighted least-squares monotone fit of `values`.
///
/// Weights default to `1 / n`.
pub fn fit_isotonic(
    values: &[f64],
    weights: Option<&[f64]>,
    direction: Direction,
) -> BarycenterResult<IsotonicFit> {
    let weights = resolve_weights(values, weights)?;
    let order = match direction {
        Direction::Increasing => ScanOrder::Forward,
        Direction::Decreasing => ScanOrder::Backward,
    };

    let mut pass = PoolingPass::new(values, &weights, order);
    while !pass.is_done() {
        pass.push_next()?;
    }
    tracing::trace!(
        "isotonic fit of {} points pooled into {} blocks",
        values.len(),
        pass.block_count()
    );

    Ok(IsotonicFit {
        fitted: pass.expand(),
        error: pass.error(),
    })
}
