//! Run configuration for stability selection.
use crate::data::{DataSet, VariableId};
use crate::error::{CausalError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CStarConfig {
    /// Number of bootstrap iterations.
    #[serde(alias = "numSubsamples")]
    pub num_subsamples: usize,
    /// Fraction of rows drawn without replacement per iteration, in (0, 1].
    #[serde(alias = "percentSubsampleSize")]
    pub percent_subsample_size: f64,
    /// How many top-ranked variables count as selected per iteration.
    #[serde(alias = "topQ")]
    pub top_q: usize,
    /// Minimum selection frequency for an edge to the target, in [0, 1).
    #[serde(alias = "piThreshold")]
    pub pi_threshold: f64,
    #[serde(alias = "targetName")]
    pub target_name: String,
    /// Run-level seed; iteration `i` draws from a stream derived from it.
    #[serde(default)]
    pub seed: u64,
    /// Worker pool size; rayon's default when absent.
    #[serde(default, alias = "numThreads")]
    pub num_threads: Option<usize>,
}

/// A configuration checked against a concrete data set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRun {
    pub target: VariableId,
    /// Every variable but the target, in data set order.
    pub candidates: Vec<VariableId>,
    pub subsample_rows: usize,
}

impl CStarConfig {
    pub fn new(target_name: impl Into<String>) -> Self {
        Self {
            num_subsamples: 100,
            percent_subsample_size: 0.5,
            top_q: 1,
            pi_threshold: 0.5,
            target_name: target_name.into(),
            seed: 0,
            num_threads: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CausalError::invalid_configuration(format!("Bad run configuration: {}", e)))
    }

    /// Checks every range, resolves the target, and fixes the subsample size.
    pub fn resolve(&self, data: &DataSet) -> Result<ResolvedRun> {
        if self.num_subsamples == 0 {
            return Err(CausalError::invalid_configuration("numSubsamples must be positive"));
        }
        if !(self.percent_subsample_size > 0.0 && self.percent_subsample_size <= 1.0) {
            return Err(CausalError::invalid_configuration(format!(
                "percentSubsampleSize must lie in (0, 1], got {}", self.percent_subsample_size
            )));
        }
        if !(self.pi_threshold >= 0.0 && self.pi_threshold < 1.0) {
            return Err(CausalError::invalid_configuration(format!(
                "piThreshold must lie in [0, 1), got {}", self.pi_threshold
            )));
        }
        if self.num_threads == Some(0) {
            return Err(CausalError::invalid_configuration("numThreads must be positive when given"));
        }

        let target = data.variable_by_name(&self.target_name).ok_or_else(|| {
            CausalError::invalid_argument(format!("Target '{}' is not a variable of the data set", self.target_name))
        })?;
        let candidates: Vec<VariableId> = data.variable_ids().filter(|&v| v != target).collect();

        if self.top_q == 0 || self.top_q > candidates.len() {
            return Err(CausalError::invalid_configuration(format!(
                "topQ must lie in [1, {}], got {}", candidates.len(), self.top_q
            )));
        }

        let subsample_rows = (self.percent_subsample_size * data.num_rows() as f64).round() as usize;
        if subsample_rows == 0 {
            return Err(CausalError::invalid_configuration(format!(
                "A {} subsample of {} rows is empty", self.percent_subsample_size, data.num_rows()
            )));
        }

        Ok(ResolvedRun { target, candidates, subsample_rows })
    }
}
