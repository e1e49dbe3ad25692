//! Pipeline orchestration: raw samples to an averaged (optionally unimodal)
//! density
//!
//! The pipeline itself holds only configuration. Independent groups of
//! distributions can be processed with [`Pipeline::run_batch`], which runs
//! them in parallel when the `parallel` feature is enabled.

use serde::{Deserialize, Serialize};

use crate::barycenter::{barycenter, Barycenter};
use crate::config::PipelineConfig;
use crate::error::{validation, BarycenterResult, ConfigResult};
use crate::slice_maybe_parallel;
use crate::unimodal::{fit_unimodal, UnimodalFit};

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Averaged distribution
    pub barycenter: Barycenter,
    /// Unimodal fit of the barycenter density, when enabled
    pub unimodal: Option<UnimodalFit>,
}

impl PipelineOutput {
    /// Final density: the unimodal fit when present, the raw barycenter
    /// density otherwise
    pub fn density(&self) -> &[f64] {
        match &self.unimodal {
            Some(fit) => &fit.fitted,
            None => &self.barycenter.density,
        }
    }

    /// Presentation axis for [`PipelineOutput::density`]
    pub fn positions(&self) -> &[f64] {
        &self.barycenter.positions
    }
}

/// Barycenter pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Average one group of distributions
    pub fn run(&self, distributions: &[Vec<f64>]) -> BarycenterResult<PipelineOutput> {
        for row in distributions {
            validation::validate_len(row.len(), self.config.max_len)?;
        }

        let barycenter = barycenter(
            distributions,
            self.config.method,
            self.config.num_levels,
            self.config.fps,
        )?;

        let unimodal = if self.config.unimodal {
            Some(fit_unimodal(&barycenter.density, None)?)
        } else {
            None
        };

        tracing::debug!(
            "pipeline run: {} distributions, {} grid points, unimodal: {}",
            distributions.len(),
            barycenter.len(),
            unimodal.is_some()
        );

        Ok(PipelineOutput {
            barycenter,
            unimodal,
        })
    }

    /// Average many independent groups; results keep the input order
    pub fn run_batch(&self, groups: &[Vec<Vec<f64>>]) -> Vec<BarycenterResult<PipelineOutput>> {
        let results: Vec<_> = slice_maybe_parallel!(groups)
            .map(|group| self.run(group))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::warn!("{} of {} barycenter groups failed", failed, groups.len());
        }
        results
    }
}
