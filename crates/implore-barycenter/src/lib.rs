//! implore-barycenter - Averaged and shape-constrained distributions
//!
//! This crate turns several sampled signals (non-negative counts over a
//! common support) into one representative curve:
//!
//! - **Normalization**: sample vector to CDF, folding zero-mass points
//! - **Quantiles**: CDF to quantile function (generalized inverse) and back
//! - **Barycenter**: pointwise mean or median of quantile functions
//! - **Unimodal regression**: nearest single-peaked curve in weighted least
//!   squares, via two PAVA passes and a mode search
//!
//! # Design Philosophy
//!
//! Averaging quantile functions instead of densities keeps the shape of the
//! inputs: two peaks at different positions average to one peak halfway
//! between them rather than a two-humped blur.
//!
//! Every function is pure and allocates only call-local buffers, so
//! independent groups can be processed concurrently with no coordination.

pub mod parallel;

pub mod aggregate;
pub mod barycenter;
pub mod cdf;
pub mod config;
pub mod error;
pub mod isotonic;
pub mod pipeline;
pub mod quantile;
pub mod unimodal;

pub use aggregate::*;
pub use barycenter::*;
pub use cdf::*;
pub use config::*;
pub use error::*;
pub use isotonic::{fit_isotonic, Direction, IsotonicFit};
pub use pipeline::*;
pub use quantile::*;
pub use unimodal::*;
