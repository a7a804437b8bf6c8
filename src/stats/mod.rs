//! Covariance store, shared covariance selection, and linear algebra.
pub mod covariance;
pub mod linalg;
pub mod moments;

pub use covariance::CovarianceMatrix;
pub use moments::{MomentSource, Scale};
