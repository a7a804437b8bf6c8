//! covariance.rs
//! Sample covariance store indexed by the data set's variable order.

use super::linalg::to_correlation;
use crate::data::{DataSet, Variable};
use crate::error::{CausalError, Result};
use nalgebra::DMatrix;

const SYMMETRY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct CovarianceMatrix {
    variables: Vec<Variable>,
    matrix: DMatrix<f64>,
    sample_size: usize,
}

impl CovarianceMatrix {
    /// Wraps a precomputed covariance matrix.
    pub fn from_matrix(variables: Vec<Variable>, matrix: DMatrix<f64>, sample_size: usize) -> Result<Self> {
        let m = variables.len();
        if matrix.nrows() != m || matrix.ncols() != m {
            return Err(CausalError::invalid_argument(format!(
                "Covariance matrix is {}x{} but {} variables were given", matrix.nrows(), matrix.ncols(), m
            )));
        }
        for i in 0..m {
            if !(matrix[(i, i)] >= 0.0) {
                return Err(CausalError::invalid_argument(format!(
                    "Variance of '{}' is {}", variables[i].name, matrix[(i, i)]
                )));
            }
            for j in (i + 1)..m {
                let (a, b) = (matrix[(i, j)], matrix[(j, i)]);
                if (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0) {
                    return Err(CausalError::invalid_argument(format!(
                        "Covariance matrix is not symmetric at ({}, {})", i, j
                    )));
                }
            }
        }
        Ok(Self { variables, matrix, sample_size })
    }

    /// Computes the covariance of every pair over the rows where both cells are
    /// defined (divisor n). Without missing cells this is the usual biased
    /// sample covariance.
    pub fn from_dataset(data: &DataSet) -> Self {
        let m = data.num_columns();
        let mut matrix = DMatrix::zeros(m, m);
        for i in 0..m {
            for j in i..m {
                let rows = data.complete_rows(&[i, j]);
                let c = covariance_over_rows(data, &rows, i, j);
                matrix[(i, j)] = c;
                matrix[(j, i)] = c;
            }
        }
        Self { variables: data.variables().to_vec(), matrix, sample_size: data.num_rows() }
    }

    pub fn variables(&self) -> &[Variable] { &self.variables }
    pub fn sample_size(&self) -> usize { self.sample_size }
    pub fn dimension(&self) -> usize { self.variables.len() }
    pub fn matrix(&self) -> &DMatrix<f64> { &self.matrix }

    pub fn get(&self, i: usize, j: usize) -> f64 { self.matrix[(i, j)] }

    /// Sub-matrix over `indices`, in the given order (rows and columns).
    pub fn select(&self, indices: &[usize]) -> DMatrix<f64> {
        DMatrix::from_fn(indices.len(), indices.len(), |r, c| self.matrix[(indices[r], indices[c])])
    }

    pub fn correlation(&self) -> Result<DMatrix<f64>> {
        to_correlation(&self.matrix)
    }

    /// Equivalent sample size `n * m / sum(C)`, with `C` the correlation matrix.
    /// Equals `n` for uncorrelated variables and `n / m` when all are collinear.
    pub fn effective_sample_size(&self) -> Result<f64> {
        let corr = self.correlation()?;
        let m = self.dimension() as f64;
        let total: f64 = corr.iter().sum();
        if !(total > 0.0) {
            return Err(CausalError::numerical(format!(
                "Correlation matrix sums to {}; equivalent sample size is undefined", total
            )));
        }
        Ok(self.sample_size as f64 * m / total)
    }
}

/// Mean-centered second moment of columns `i` and `j` over `rows`.
pub(crate) fn covariance_over_rows(data: &DataSet, rows: &[usize], i: usize, j: usize) -> f64 {
    let n = rows.len() as f64;
    let (ci, cj) = (data.column(i), data.column(j));
    let mean_i = rows.iter().map(|&r| ci[r]).sum::<f64>() / n;
    let mean_j = rows.iter().map(|&r| cj[r]).sum::<f64>() / n;
    rows.iter().map(|&r| (ci[r] - mean_i) * (cj[r] - mean_j)).sum::<f64>() / n
}
