//! Penalty rules and score configuration.
use crate::error::{CausalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which sample size a rule feeds into its likelihood and penalty terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleSizeBasis {
    /// The number of rows the score was built from.
    #[default]
    Raw,
    /// N as configured on the score: the equivalent sample size when that
    /// option is enabled, the raw count otherwise.
    Effective,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighDimensionalParams {
    /// Replaces `log(N)` with `multiplier * log(m)` in the penalty.
    pub multiplier: f64,
}

impl Default for HighDimensionalParams {
    fn default() -> Self { Self { multiplier: 6.0 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialCorrelationParams {
    /// Sample size used by the direct partial-correlation score difference.
    /// Historically this was the raw row count even when the equivalent
    /// sample size is enabled; `Effective` makes it agree with `local_score`.
    pub sample_size: SampleSizeBasis,
}

/// The penalized-likelihood formula applied to a residual variance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScoreRule {
    /// `-N log(v) - c (p + 1) log(N) + 2 prior(p)`
    #[default]
    Standard,
    /// `-N log(v) - c (p + 1) multiplier log(m) + 2 prior(p)`
    HighDimensional(HighDimensionalParams),
    /// Scores as `Standard`, but score differences come straight from the
    /// partial correlation of the added variable and the target.
    PartialCorrelation(PartialCorrelationParams),
}

impl ScoreRule {
    pub fn name(&self) -> &'static str {
        match self {
            ScoreRule::Standard => "standard",
            ScoreRule::HighDimensional(_) => "high-dimensional",
            ScoreRule::PartialCorrelation(_) => "partial-correlation",
        }
    }
}

impl fmt::Display for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoreRule {
    type Err = CausalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "standard" | "chickering" => Ok(ScoreRule::Standard),
            "high-dimensional" => Ok(ScoreRule::HighDimensional(HighDimensionalParams::default())),
            "partial-correlation" | "nandy" => Ok(ScoreRule::PartialCorrelation(PartialCorrelationParams::default())),
            other => Err(CausalError::unsupported(format!("Unknown score rule '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub rule: ScoreRule,
    /// Multiplies the complexity penalty; 1 is plain BIC.
    pub penalty_discount: f64,
    /// Expected number of parents per variable; 0 disables the prior.
    pub structure_prior: f64,
    pub use_equivalent_sample_size: bool,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            rule: ScoreRule::Standard,
            penalty_discount: 1.0,
            structure_prior: 0.0,
            use_equivalent_sample_size: false,
        }
    }
}

impl ScoreConfig {
    pub fn validate(&self, num_variables: usize) -> Result<()> {
        if !self.penalty_discount.is_finite() || self.penalty_discount < 0.0 {
            return Err(CausalError::invalid_configuration(format!(
                "Penalty discount must be finite and non-negative, got {}", self.penalty_discount
            )));
        }
        if !(self.structure_prior >= 0.0) || self.structure_prior >= num_variables as f64 {
            return Err(CausalError::invalid_configuration(format!(
                "Structure prior must lie in [0, {}), got {}", num_variables, self.structure_prior
            )));
        }
        if let ScoreRule::HighDimensional(params) = self.rule {
            if !params.multiplier.is_finite() || params.multiplier <= 0.0 {
                return Err(CausalError::invalid_configuration(format!(
                    "High-dimensional multiplier must be positive, got {}", params.multiplier
                )));
            }
        }
        Ok(())
    }
}

/// Binomial prior on parent-set size: `-(k log p + (m - k) log(1 - p))` with
/// `p = weight / m`. Zero when the weight is zero.
pub fn structure_prior_term(weight: f64, parents: usize, num_variables: usize) -> f64 {
    if weight.abs() <= 0.0 {
        return 0.0;
    }
    let m = num_variables as f64;
    let k = parents as f64;
    let p = weight / m;
    -(k * p.ln() + (m - k) * (1.0 - p).ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("standard", "standard")]
    #[case("Chickering", "standard")]
    #[case("high_dimensional", "high-dimensional")]
    #[case("partial-correlation", "partial-correlation")]
    #[case("NANDY", "partial-correlation")]
    fn test_rule_names_parse(#[case] input: &str, #[case] expected: &str) {
        let rule: ScoreRule = input.parse().unwrap();
        assert_eq!(rule.name(), expected);
    }

    #[test]
    fn test_unknown_rule_is_unsupported() {
        let err = "aic".parse::<ScoreRule>().unwrap_err();
        assert!(matches!(err, CausalError::UnsupportedConfiguration { .. }));
    }

    #[test]
    fn test_default_rule_is_standard() {
        assert_eq!(ScoreRule::default(), ScoreRule::Standard);
        assert_eq!(ScoreConfig::default().rule, ScoreRule::Standard);
    }

    #[test]
    fn test_structure_prior_zero_weight() {
        assert_eq!(structure_prior_term(0.0, 3, 10), 0.0);
    }

    #[test]
    fn test_structure_prior_binomial_form() {
        let term = structure_prior_term(1.0, 2, 10);
        let expected = -(2.0 * 0.1f64.ln() + 8.0 * 0.9f64.ln());
        assert!((term - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(ScoreConfig { penalty_discount: -1.0, ..Default::default() })]
    #[case(ScoreConfig { penalty_discount: f64::NAN, ..Default::default() })]
    #[case(ScoreConfig { structure_prior: 5.0, ..Default::default() })]
    #[case(ScoreConfig { structure_prior: -0.5, ..Default::default() })]
    #[case(ScoreConfig { rule: ScoreRule::HighDimensional(HighDimensionalParams { multiplier: 0.0 }), ..Default::default() })]
    fn test_invalid_configs_rejected(#[case] config: ScoreConfig) {
        let err = config.validate(5).unwrap_err();
        assert!(matches!(err, CausalError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{"rule": {"kind": "high-dimensional", "multiplier": 8.0}, "penalty_discount": 2.0}"#;
        let config: ScoreConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rule, ScoreRule::HighDimensional(HighDimensionalParams { multiplier: 8.0 }));
        assert_eq!(config.penalty_discount, 2.0);
        assert_eq!(config.structure_prior, 0.0);
    }
}
