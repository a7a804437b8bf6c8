//! moments.rs
//! The covariance selection shared by every local score.
//!
//! A score is backed either by a covariance store (no row subsetting) or, when
//! the data has missing cells, by the raw data set, in which case each query
//! recomputes its moments over the rows complete for the queried variables.

use super::covariance::{covariance_over_rows, CovarianceMatrix};
use super::linalg::to_correlation;
use crate::data::{DataSet, Variable};
use crate::error::{CausalError, Result};
use nalgebra::DMatrix;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Covariance,
    Correlation,
}

#[derive(Debug, Clone)]
pub enum MomentSource {
    Covariance(Arc<CovarianceMatrix>),
    RowSubset(Arc<DataSet>),
}

impl MomentSource {
    /// Uses the covariance form unless the data has missing cells.
    pub fn from_dataset(data: Arc<DataSet>) -> Self {
        if data.has_missing() {
            MomentSource::RowSubset(data)
        } else {
            MomentSource::Covariance(Arc::new(CovarianceMatrix::from_dataset(&data)))
        }
    }

    pub fn variables(&self) -> &[Variable] {
        match self {
            MomentSource::Covariance(cov) => cov.variables(),
            MomentSource::RowSubset(data) => data.variables(),
        }
    }

    pub fn sample_size(&self) -> usize {
        match self {
            MomentSource::Covariance(cov) => cov.sample_size(),
            MomentSource::RowSubset(data) => data.num_rows(),
        }
    }

    pub fn requires_row_subsets(&self) -> bool {
        matches!(self, MomentSource::RowSubset(_))
    }

    pub fn data(&self) -> Option<&DataSet> {
        match self {
            MomentSource::RowSubset(data) => Some(data),
            MomentSource::Covariance(_) => None,
        }
    }

    /// Covariance form of the whole source. Built on demand for row-subset
    /// sources from pairwise-complete rows.
    pub fn covariance(&self) -> Arc<CovarianceMatrix> {
        match self {
            MomentSource::Covariance(cov) => Arc::clone(cov),
            MomentSource::RowSubset(data) => Arc::new(CovarianceMatrix::from_dataset(data)),
        }
    }

    /// Joint moment matrix over `indices` (in order). Row-subset sources only
    /// use rows defined for every listed index.
    pub fn select(&self, indices: &[usize], scale: Scale) -> Result<DMatrix<f64>> {
        let m = self.variables().len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= m) {
            return Err(CausalError::invalid_argument(format!(
                "Variable index {} out of range for {} variables", bad, m
            )));
        }

        let cov = match self {
            MomentSource::Covariance(cov) => cov.select(indices),
            MomentSource::RowSubset(data) => {
                let rows = data.complete_rows(indices);
                if rows.is_empty() {
                    return Err(CausalError::numerical(format!(
                        "No rows are complete for variables {:?}", indices
                    )));
                }
                let k = indices.len();
                let mut cov = DMatrix::zeros(k, k);
                for a in 0..k {
                    for b in a..k {
                        let c = covariance_over_rows(data, &rows, indices[a], indices[b]);
                        cov[(a, b)] = c;
                        cov[(b, a)] = c;
                    }
                }
                cov
            }
        };

        match scale {
            Scale::Covariance => Ok(cov),
            Scale::Correlation => {
                if let Some(k) = (0..indices.len()).find(|&k| !(cov[(k, k)] > 0.0)) {
                    return Err(CausalError::numerical(format!(
                        "Variance of '{}' is {}; cannot normalize to correlation",
                        self.variables()[indices[k]].name, cov[(k, k)]
                    )));
                }
                to_correlation(&cov)
            }
        }
    }
}
