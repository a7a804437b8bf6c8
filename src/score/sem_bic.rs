//! sem_bic.rs
//! BIC-style score for linear Gaussian models.
//!
//! Moments are taken on correlation scale, so the residual variance of a
//! variable with no parents is 1 and scores are invariant to rescaling the
//! columns.

use super::rule::{structure_prior_term, SampleSizeBasis, ScoreConfig, ScoreRule};
use super::{in_query, query_indices, with_parent, Score};
use crate::data::{DataSet, Variable};
use crate::error::{CausalError, Result};
use crate::stats::linalg::{partial_correlation, residual_variance};
use crate::stats::{CovarianceMatrix, MomentSource, Scale};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SemBicScore {
    source: MomentSource,
    config: ScoreConfig,
    // Sample size entering the likelihood: raw count or equivalent sample size.
    n: f64,
}

impl SemBicScore {
    pub fn from_covariance(covariances: CovarianceMatrix) -> Result<Self> {
        Self::from_source(MomentSource::Covariance(Arc::new(covariances)))
    }

    /// Data without missing cells is converted to covariance form; otherwise
    /// every query recomputes its moments over its own complete rows.
    pub fn from_dataset(data: Arc<DataSet>) -> Result<Self> {
        Self::from_source(MomentSource::from_dataset(data))
    }

    pub fn from_source(source: MomentSource) -> Result<Self> {
        if source.variables().is_empty() {
            return Err(CausalError::invalid_argument("Cannot score an empty set of variables"));
        }
        let n = source.sample_size() as f64;
        Ok(Self { source, config: ScoreConfig::default(), n })
    }

    pub fn with_config(mut self, config: ScoreConfig) -> Result<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    pub fn config(&self) -> &ScoreConfig { &self.config }
    pub fn rule(&self) -> ScoreRule { self.config.rule }
    pub fn penalty_discount(&self) -> f64 { self.config.penalty_discount }
    pub fn structure_prior(&self) -> f64 { self.config.structure_prior }
    pub fn source(&self) -> &MomentSource { &self.source }

    /// N as used by the likelihood term.
    pub fn effective_n(&self) -> f64 { self.n }

    pub fn set_config(&mut self, config: ScoreConfig) -> Result<()> {
        config.validate(self.source.variables().len())?;
        self.n = if config.use_equivalent_sample_size {
            self.source.covariance().effective_sample_size()?
        } else {
            self.source.sample_size() as f64
        };
        self.config = config;
        Ok(())
    }

    pub fn set_rule(&mut self, rule: ScoreRule) -> Result<()> {
        self.set_config(ScoreConfig { rule, ..self.config })
    }

    pub fn set_penalty_discount(&mut self, penalty_discount: f64) -> Result<()> {
        self.set_config(ScoreConfig { penalty_discount, ..self.config })
    }

    pub fn set_structure_prior(&mut self, structure_prior: f64) -> Result<()> {
        self.set_config(ScoreConfig { structure_prior, ..self.config })
    }

    pub fn set_use_equivalent_sample_size(&mut self, use_equivalent_sample_size: bool) -> Result<()> {
        self.set_config(ScoreConfig { use_equivalent_sample_size, ..self.config })
    }

    fn query_error(&self, e: CausalError, target: usize, parents: &[usize]) -> CausalError {
        debug!(target, ?parents, error = %e, "local score failed");
        in_query(e, self.source.variables(), target, parents)
    }

    fn prior(&self, parents: usize) -> f64 {
        structure_prior_term(self.config.structure_prior, parents, self.source.variables().len())
    }

    /// Score gain of adding `x` to `parents`, from the partial correlation of
    /// `x` and `target` given `parents`.
    fn partial_correlation_diff(&self, x: usize, target: usize, parents: &[usize], basis: SampleSizeBasis) -> Result<f64> {
        let mut indices = query_indices(self.source.variables().len(), target, &with_parent(parents, x))?;
        // Partial correlation reads positions 0 and 1.
        let last = indices.len() - 1;
        indices.swap(1, last);

        let r = self.source
            .select(&indices, Scale::Correlation)
            .and_then(|corr| partial_correlation(&corr))
            .map_err(|e| self.query_error(e, target, &with_parent(parents, x)))?;

        let n = match basis {
            SampleSizeBasis::Raw => self.source.sample_size() as f64,
            SampleSizeBasis::Effective => self.n,
        };
        let c = self.config.penalty_discount;
        let p = parents.len();

        Ok(-n * (1.0 - r * r).ln() - c * n.ln() + 2.0 * (self.prior(p + 1) - self.prior(p)))
    }
}

impl Score for SemBicScore {
    fn local_score(&self, target: usize, parents: &[usize]) -> Result<f64> {
        let all = query_indices(self.source.variables().len(), target, parents)?;
        let varey = self.source
            .select(&all, Scale::Correlation)
            .and_then(|cov| residual_variance(&cov))
            .map_err(|e| self.query_error(e, target, parents))?;

        let n = self.n;
        let c = self.config.penalty_discount;
        let p = parents.len();
        let k = (p + 1) as f64;

        let score = match self.config.rule {
            ScoreRule::Standard | ScoreRule::PartialCorrelation(_) => {
                -n * varey.ln() - c * k * n.ln() + 2.0 * self.prior(p)
            }
            ScoreRule::HighDimensional(params) => {
                let m = self.source.variables().len() as f64;
                -n * varey.ln() - c * k * params.multiplier * m.ln() + 2.0 * self.prior(p)
            }
        };
        Ok(score)
    }

    fn local_score_diff(&self, x: usize, target: usize, parents: &[usize]) -> Result<f64> {
        match self.config.rule {
            ScoreRule::PartialCorrelation(params) => {
                self.partial_correlation_diff(x, target, parents, params.sample_size)
            }
            _ => {
                let with_x = self.local_score(target, &with_parent(parents, x))?;
                Ok(with_x - self.local_score(target, parents)?)
            }
        }
    }

    fn variables(&self) -> &[Variable] { self.source.variables() }

    fn sample_size(&self) -> usize { self.source.sample_size() }
}
