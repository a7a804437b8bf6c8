// Core library: Gaussian local scores for greedy structure search and
// bootstrap stability selection (CStaR) of a target's causal neighborhood.
//
// Layout: `data` holds variables and data sets, `stats` the shared covariance
// selection, `score` the decomposable scores, `oracle` the effect-ranking
// seam, `stability` the bootstrap driver, `graph` and `display` its output.

pub mod data;
pub mod display;
pub mod error;
pub mod graph;
pub mod oracle;
pub mod score;
pub mod stability;
pub mod stats;

pub use data::{DataSet, Variable, VariableId, VariableKind};
pub use error::{CausalError, Result};
pub use graph::CausalNeighborhood;
pub use oracle::{EffectRanker, ScoreGainRanker};
pub use score::{BoundRiskScore, Score, ScoreConfig, ScoreRule, SemBicScore};
pub use stability::{CStar, CStarConfig, FrequencyTable, StabilityResult};
pub use stats::CovarianceMatrix;
