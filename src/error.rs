//! Crate-wide error type.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CausalError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
    #[error("Unsupported configuration: {message}")]
    UnsupportedConfiguration { message: String },
    #[error("Numerical failure: {context}")]
    NumericalFailure { context: String },
    /// Drawing the subsample of a bootstrap iteration failed.
    #[error("Subsampling failed at bootstrap #{iteration}: {source}")]
    SubsampleFailure { iteration: usize, source: Box<CausalError> },
    /// The effect-ranking oracle failed inside a bootstrap iteration.
    #[error("Effect ranking failed at bootstrap #{iteration}: {source}")]
    OracleFailure { iteration: usize, source: Box<CausalError> },
}

impl CausalError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration { message: message.into() }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration { message: message.into() }
    }

    pub fn numerical(context: impl Into<String>) -> Self {
        Self::NumericalFailure { context: context.into() }
    }

    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::NumericalFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, CausalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_failure_reports_iteration_and_cause() {
        let err = CausalError::OracleFailure {
            iteration: 7,
            source: Box::new(CausalError::numerical("singular parent covariance")),
        };
        let msg = err.to_string();
        assert!(msg.contains("#7"), "Msg: {}", msg);
        assert!(msg.contains("singular parent covariance"), "Msg: {}", msg);
    }

    #[test]
    fn test_subsample_failure_reports_iteration() {
        let err = CausalError::SubsampleFailure {
            iteration: 3,
            source: Box::new(CausalError::invalid_configuration("too many rows")),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Subsampling failed at bootstrap #3"), "Msg: {}", msg);
        assert!(msg.contains("too many rows"), "Msg: {}", msg);
    }
}
