//! bound.rs
//! Risk-bound score after Zhang & Shen: the complexity penalty for a parent
//! set of size `m0` is the smallest `lambda` whose selection risk bound holds
//! with probability `1 - risk_bound`.

use super::{in_query, query_indices, Score};
use crate::data::{DataSet, Variable};
use crate::error::{CausalError, Result};
use crate::stats::linalg::{ols_residual_sum_of_squares, residual_variance};
use crate::stats::{CovarianceMatrix, MomentSource, Scale};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LAMBDA_UPPER: f64 = 100_000.0;
const LAMBDA_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundRiskConfig {
    /// Probability that the risk bound is allowed to fail, in [0, 1].
    pub risk_bound: f64,
    /// Error variance assumed for the true model.
    pub true_error_variance: f64,
    /// Use the residual sum of squares of an explicit regression on the raw
    /// data instead of `N * sd(residual)` from the covariance.
    pub calculate_squared_norms: bool,
}

impl Default for BoundRiskConfig {
    fn default() -> Self {
        Self { risk_bound: 0.05, true_error_variance: 1.0, calculate_squared_norms: false }
    }
}

#[derive(Debug, Clone)]
pub struct BoundRiskScore {
    source: MomentSource,
    data: Option<Arc<DataSet>>,
    config: BoundRiskConfig,
    // lambdas[m0] for every parent-set size 0..m.
    lambdas: Vec<f64>,
}

impl BoundRiskScore {
    pub fn from_covariance(covariances: CovarianceMatrix) -> Result<Self> {
        Self::build(MomentSource::Covariance(Arc::new(covariances)), None)
    }

    pub fn from_dataset(data: Arc<DataSet>) -> Result<Self> {
        Self::build(MomentSource::from_dataset(Arc::clone(&data)), Some(data))
    }

    fn build(source: MomentSource, data: Option<Arc<DataSet>>) -> Result<Self> {
        if source.variables().is_empty() {
            return Err(CausalError::invalid_argument("Cannot score an empty set of variables"));
        }
        let mut score = Self { source, data, config: BoundRiskConfig::default(), lambdas: Vec::new() };
        score.set_config(BoundRiskConfig::default())?;
        Ok(score)
    }

    pub fn with_config(mut self, config: BoundRiskConfig) -> Result<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    pub fn config(&self) -> &BoundRiskConfig { &self.config }

    pub fn set_config(&mut self, config: BoundRiskConfig) -> Result<()> {
        if !(0.0..=1.0).contains(&config.risk_bound) {
            return Err(CausalError::invalid_configuration(format!(
                "Risk probability should be in [0, 1]: {}", config.risk_bound
            )));
        }
        if config.calculate_squared_norms && self.data.is_none() {
            return Err(CausalError::invalid_configuration(
                "Squared norms need the raw data set, but the score was built from a covariance matrix",
            ));
        }
        let pn = self.source.variables().len() - 1;
        self.lambdas = (0..=pn).map(|m0| zhang_shen_lambda(pn, m0, config.risk_bound)).collect();
        self.config = config;
        Ok(())
    }

    /// Penalty for a parent set of the given size; `None` past `m - 1` parents.
    pub fn lambda(&self, parents: usize) -> Option<f64> {
        self.lambdas.get(parents).copied()
    }

    fn squared_norm(&self, data: &DataSet, all: &[usize]) -> Result<f64> {
        let rows = data.complete_rows(all);
        let y = DVector::from_iterator(rows.len(), rows.iter().map(|&r| data.value(r, all[0])));
        let parents = &all[1..];
        let x = DMatrix::from_fn(rows.len(), parents.len(), |r, c| data.value(rows[r], parents[c]));
        ols_residual_sum_of_squares(&y, &x)
    }
}

impl Score for BoundRiskScore {
    fn local_score(&self, target: usize, parents: &[usize]) -> Result<f64> {
        let all = query_indices(self.source.variables().len(), target, parents)?;
        let p = parents.len();

        let lambda = self.lambda(p).ok_or_else(|| {
            CausalError::invalid_argument(format!("No penalty for {} parents", p))
        })?;

        let sum = match (&self.data, self.config.calculate_squared_norms) {
            (Some(data), true) => self.squared_norm(data, &all),
            _ => self.source
                .select(&all, Scale::Covariance)
                .and_then(|cov| residual_variance(&cov))
                .map(|v| self.source.sample_size() as f64 * v.sqrt()),
        }
        .map_err(|e| in_query(e, self.source.variables(), target, parents))?;

        Ok(-sum - lambda * p as f64 * self.config.true_error_variance)
    }

    fn variables(&self) -> &[Variable] { self.source.variables() }

    fn sample_size(&self) -> usize { self.source.sample_size() }
}

/// Bisects for the penalty at which the bound probability reaches
/// `1 - risk_bound`, with `pn` candidate variables and `m0` selected.
pub fn zhang_shen_lambda(pn: usize, m0: usize, risk_bound: f64) -> f64 {
    let mut high = LAMBDA_UPPER;
    let mut low = 0.0;

    while high - low > LAMBDA_TOLERANCE {
        let lambda = (high + low) / 2.0;
        if bound_probability(pn, m0, lambda) < 1.0 - risk_bound {
            low = lambda;
        } else {
            high = lambda;
        }
    }

    (high + low) / 2.0
}

fn bound_probability(pn: usize, m0: usize, lambda: f64) -> f64 {
    let base = 1.0 + (-(lambda - 1.0) / 2.0).exp() * lambda.sqrt();
    2.0 - base.powi(pn as i32 - m0 as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Arc<DataSet> {
        let vars = ["Y", "X", "Z"].iter().map(|s| Variable::continuous(*s)).collect();
        let x: Vec<f64> = (0..40).map(|i| (i as f64 * 0.37).sin()).collect();
        let z: Vec<f64> = (0..40).map(|i| (i as f64 * 1.91).cos()).collect();
        let y: Vec<f64> = x.iter().zip(&z).enumerate()
            .map(|(i, (a, b))| 2.0 * a + 0.1 * b + 0.05 * ((i * 7 % 11) as f64 - 5.0))
            .collect();
        Arc::new(DataSet::from_columns(vars, vec![y, x, z]).unwrap())
    }

    #[test]
    fn test_lambda_grows_with_fewer_selected() {
        let l0 = zhang_shen_lambda(10, 0, 0.05);
        let l5 = zhang_shen_lambda(10, 5, 0.05);
        assert!(l0 > l5, "{} vs {}", l0, l5);
        // At the bound the probability sits at 1 - risk.
        assert!((bound_probability(10, 0, l0) - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_lambda_is_defined_up_to_all_other_variables() {
        let score = BoundRiskScore::from_dataset(data()).unwrap();
        assert!(score.lambda(0).unwrap() > score.lambda(2).unwrap());
        assert_eq!(score.lambda(3), None);
    }

    #[test]
    fn test_singular_regression_names_the_query() {
        let vars = ["Y", "X", "Z"].iter().map(|s| Variable::continuous(*s)).collect();
        let m = DMatrix::from_row_slice(3, 3, &[1.0, 0.5, 0.5, 0.5, 1.0, 1.0, 0.5, 1.0, 1.0]);
        let score = BoundRiskScore::from_covariance(CovarianceMatrix::from_matrix(vars, m, 50).unwrap()).unwrap();
        let err = score.local_score(0, &[1, 2]).unwrap_err();
        assert!(err.is_numerical());
        assert!(err.to_string().contains("Scoring 'Y' given [X, Z]"), "Msg: {}", err);
    }

    #[test]
    fn test_risk_bound_out_of_range() {
        let score = BoundRiskScore::from_dataset(data()).unwrap();
        let err = score.with_config(BoundRiskConfig { risk_bound: 1.5, ..Default::default() }).unwrap_err();
        assert!(matches!(err, CausalError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_squared_norms_need_raw_data() {
        let ds = data();
        let cov = CovarianceMatrix::from_dataset(&ds);
        let score = BoundRiskScore::from_covariance(cov).unwrap();
        assert!(score.with_config(BoundRiskConfig { calculate_squared_norms: true, ..Default::default() }).is_err());
    }

    #[test]
    fn test_true_parent_scores_higher_than_none() {
        for squared in [false, true] {
            let score = BoundRiskScore::from_dataset(data()).unwrap()
                .with_config(BoundRiskConfig { calculate_squared_norms: squared, ..Default::default() })
                .unwrap();
            let empty = score.local_score(0, &[]).unwrap();
            let with_x = score.local_score(0, &[1]).unwrap();
            assert!(with_x > empty, "squared={}: {} vs {}", squared, with_x, empty);
        }
    }

    #[test]
    fn test_diff_is_difference_of_scores() {
        let score = BoundRiskScore::from_dataset(data()).unwrap();
        let diff = score.local_score_diff(2, 0, &[1]).unwrap();
        let expected = score.local_score(0, &[1, 2]).unwrap() - score.local_score(0, &[1]).unwrap();
        assert!((diff - expected).abs() < 1e-9);
    }
}
