//! Dense linear algebra used by the local scores.
//!
//! Every function takes a joint covariance (or correlation) matrix laid out
//! with the target in position 0 and returns a `NumericalFailure` when a
//! required inverse does not exist.

use crate::error::{CausalError, Result};
use nalgebra::{DMatrix, DVector};

/// Rescales a covariance matrix to correlation scale.
///
/// Fails when any diagonal entry is not strictly positive, since the
/// normalization divides by `sqrt(c_ii * c_jj)`.
pub fn to_correlation(cov: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = cov.nrows();
    let mut scale = Vec::with_capacity(n);
    for i in 0..n {
        let d = cov[(i, i)];
        if !(d > 0.0) {
            return Err(CausalError::numerical(format!(
                "Cannot normalize to correlation: diagonal entry {} is {}", i, d
            )));
        }
        scale.push(d.sqrt());
    }
    Ok(DMatrix::from_fn(n, n, |i, j| {
        if i == j { 1.0 } else { cov[(i, j)] / (scale[i] * scale[j]) }
    }))
}

/// Residual variance of variable 0 regressed on variables 1.. of `cov`.
///
/// Solves the normal equations `b = Sxx^-1 Sxy`, then evaluates the quadratic
/// form `a' S a` with `a = (1, -b)`. May return a value `<= 0` or NaN for
/// (nearly) deterministic relations; callers decide what that means.
pub fn residual_variance(cov: &DMatrix<f64>) -> Result<f64> {
    let p = cov.nrows() - 1;
    if p == 0 {
        return Ok(cov[(0, 0)]);
    }

    let covxx = cov.view((1, 1), (p, p)).into_owned();
    let covxy = cov.view((1, 0), (p, 1)).into_owned();

    let inv = covxx.try_inverse().ok_or_else(|| {
        CausalError::numerical(format!("Parent covariance ({}x{}) is singular", p, p))
    })?;
    let b = inv * covxy;

    let mut a = DVector::zeros(p + 1);
    a[0] = 1.0;
    for j in 0..p {
        a[j + 1] = -b[(j, 0)];
    }

    Ok((a.transpose() * cov * &a)[(0, 0)])
}

/// Partial correlation of variables 0 and 1 given variables 2.. of `cov`,
/// read off the precision matrix.
pub fn partial_correlation(cov: &DMatrix<f64>) -> Result<f64> {
    if cov.nrows() < 2 {
        return Err(CausalError::invalid_argument("Partial correlation needs at least two variables"));
    }
    let precision = cov.clone().try_inverse().ok_or_else(|| {
        CausalError::numerical(format!("Conditioning covariance ({}x{}) is singular", cov.nrows(), cov.ncols()))
    })?;
    Ok(-precision[(0, 1)] / (precision[(0, 0)] * precision[(1, 1)]).sqrt())
}

/// Sum of squared residuals of an OLS fit of `y` on `x` plus an intercept.
pub fn ols_residual_sum_of_squares(y: &DVector<f64>, x: &DMatrix<f64>) -> Result<f64> {
    let n = y.len();
    let k = x.ncols();
    let design = DMatrix::from_fn(n, k + 1, |r, c| if c < k { x[(r, c)] } else { 1.0 });

    let xt = design.transpose();
    let xtx_inv = (&xt * &design).try_inverse().ok_or_else(|| {
        CausalError::numerical(format!("Design matrix with {} regressors is rank deficient", k))
    })?;
    let b = xtx_inv * (&xt * y);
    let residuals = y - design * b;
    Ok(residuals.norm_squared())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_correlation_has_unit_diagonal() {
        let cov = DMatrix::from_row_slice(2, 2, &[4.0, 2.0, 2.0, 9.0]);
        let corr = to_correlation(&cov).unwrap();
        assert!((corr[(0, 0)] - 1.0).abs() < EPS);
        assert!((corr[(0, 1)] - 2.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn test_correlation_fails_on_zero_variance() {
        let cov = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 0.0]);
        assert!(to_correlation(&cov).unwrap_err().is_numerical());
    }

    #[test]
    fn test_residual_variance_matches_closed_form() {
        // One parent on correlation scale: 1 - r^2.
        let r = 0.6;
        let corr = DMatrix::from_row_slice(2, 2, &[1.0, r, r, 1.0]);
        let v = residual_variance(&corr).unwrap();
        assert!((v - (1.0 - r * r)).abs() < EPS);
    }

    #[test]
    fn test_residual_variance_without_parents_is_variance() {
        let cov = DMatrix::from_row_slice(1, 1, &[2.5]);
        assert_eq!(residual_variance(&cov).unwrap(), 2.5);
    }

    #[test]
    fn test_singular_parents_are_numerical_failures() {
        let cov = DMatrix::from_row_slice(3, 3, &[
            1.0, 0.5, 0.5,
            0.5, 1.0, 1.0,
            0.5, 1.0, 1.0,
        ]);
        assert!(residual_variance(&cov).unwrap_err().is_numerical());
    }

    #[test]
    fn test_partial_correlation_without_conditioning_is_correlation() {
        let corr = DMatrix::from_row_slice(2, 2, &[1.0, -0.3, -0.3, 1.0]);
        assert!((partial_correlation(&corr).unwrap() + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_ols_exact_fit_has_zero_residual() {
        let x = DMatrix::from_column_slice(4, 1, &[1.0, 2.0, 3.0, 4.0]);
        let y = DVector::from_column_slice(&[3.0, 5.0, 7.0, 9.0]);
        assert!(ols_residual_sum_of_squares(&y, &x).unwrap() < 1e-18);
    }
}
