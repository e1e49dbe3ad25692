//! Configuration for the barycenter pipeline
//!
//! Every knob is explicit. The aggregation method has no default: a TOML or
//! JSON document without `method` is rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregationMethod;
use crate::error::{ConfigError, ConfigResult};

/// Default length bound for a single input row
pub const DEFAULT_MAX_LEN: usize = 1_000_000;

fn default_fps() -> f64 {
    1.0
}

fn default_max_len() -> usize {
    DEFAULT_MAX_LEN
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Aggregation rule for quantile functions
    pub method: AggregationMethod,
    /// Number of probability levels (defaults to the support length)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_levels: Option<usize>,
    /// Sampling rate used to rescale the output position axis
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Post-process the density with unimodal regression
    #[serde(default)]
    pub unimodal: bool,
    /// Longest accepted row (and level count)
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

impl PipelineConfig {
    /// Create a configuration with the given method and defaults elsewhere
    pub fn new(method: AggregationMethod) -> Self {
        Self {
            method,
            num_levels: None,
            fps: default_fps(),
            unimodal: false,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Set the number of probability levels
    pub fn with_num_levels(mut self, num_levels: usize) -> Self {
        self.num_levels = Some(num_levels);
        self
    }

    /// Set the sampling rate
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Enable or disable unimodal post-processing
    pub fn with_unimodal(mut self, unimodal: bool) -> Self {
        self.unimodal = unimodal;
        self
    }

    /// Set the length bound
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load and validate configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        tracing::debug!("Loaded pipeline configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ConfigResult<Self> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::OutOfRange(format!(
                "fps must be finite and positive, got {}",
                self.fps
            )));
        }

        if self.num_levels == Some(0) {
            return Err(ConfigError::OutOfRange(
                "num_levels must be positive".to_string(),
            ));
        }

        if self.max_len == 0 {
            return Err(ConfigError::OutOfRange(
                "max_len must be positive".to_string(),
            ));
        }

        if let Some(k) = self.num_levels {
            if k > self.max_len {
                return Err(ConfigError::OutOfRange(format!(
                    "num_levels {} exceeds max_len {}",
                    k, self.max_len
                )));
            }
        }

        Ok(())
    }
}
