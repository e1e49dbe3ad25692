//! Error types for implore-barycenter
//!
//! Every failure here is a deterministic precondition violation detected at
//! the top of the offending function. Retrying with the same input reproduces
//! the same error.

use thiserror::Error;

/// Errors raised by normalization, barycenter averaging and shape-constrained
/// regression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarycenterError {
    /// Two sequences that must have equal length do not
    #[error("Shape mismatch for {what}: expected length {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Sample vector has no mass (all zeros, or empty)
    #[error("Degenerate input: sample vector sums to zero")]
    DegenerateInput,

    /// No distributions were supplied to the averager
    #[error("Empty input: at least one distribution is required")]
    EmptyInput,

    /// Pooling would divide by a zero aggregate weight
    #[error("Degenerate weight: pooled block ending at index {index} has zero total weight")]
    DegenerateWeight { index: usize },

    /// Negative or non-finite entry where a finite non-negative value is required
    #[error("Invalid {what} at index {index}: {value}")]
    InvalidValue {
        what: &'static str,
        index: usize,
        value: f64,
    },

    /// Probability levels are empty, out of (0, 1], or decreasing
    #[error("Invalid probability levels: {0}")]
    InvalidLevels(String),

    /// Sampling rate must be finite and positive
    #[error("Invalid sampling rate: {0} (must be finite and > 0)")]
    InvalidFps(f64),

    /// Input exceeds the configured length bound
    #[error("Input too long: {len} points (max: {max})")]
    TooLong { len: usize, max: usize },
}

/// Errors related to pipeline configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML or JSON could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// Configuration file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value is out of its valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

/// Result type alias for barycenter and regression operations
pub type BarycenterResult<T> = Result<T, BarycenterError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Validation utilities shared by every entry point
pub mod validation {
    use super::*;

    /// Require every entry to be finite and non-negative
    pub fn validate_non_negative(what: &'static str, data: &[f64]) -> BarycenterResult<()> {
        match data
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            Some((index, &value)) => Err(BarycenterError::InvalidValue { what, index, value }),
            None => Ok(()),
        }
    }

    /// Require every entry to be finite
    pub fn validate_finite(what: &'static str, data: &[f64]) -> BarycenterResult<()> {
        match data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            Some((index, &value)) => Err(BarycenterError::InvalidValue { what, index, value }),
            None => Ok(()),
        }
    }

    /// Require two lengths to agree
    pub fn validate_same_len(
        what: &'static str,
        expected: usize,
        actual: usize,
    ) -> BarycenterResult<()> {
        if expected != actual {
            return Err(BarycenterError::ShapeMismatch {
                what,
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Enforce the length bound
    pub fn validate_len(len: usize, max: usize) -> BarycenterResult<()> {
        if len > max {
            return Err(BarycenterError::TooLong { len, max });
        }
        Ok(())
    }

    /// Levels must be non-empty, lie in (0, 1] and be non-decreasing
    pub fn validate_levels(levels: &[f64]) -> BarycenterResult<()> {
        if levels.is_empty() {
            return Err(BarycenterError::InvalidLevels("no levels given".to_string()));
        }
        if let Some(p) = levels.iter().find(|p| !(**p > 0.0 && **p <= 1.0)) {
            return Err(BarycenterError::InvalidLevels(format!(
                "level {} is outside (0, 1]",
                p
            )));
        }
        if levels.windows(2).any(|w| w[1] < w[0]) {
            return Err(BarycenterError::InvalidLevels(
                "levels must be non-decreasing".to_string(),
            ));
        }
        Ok(())
    }
}
