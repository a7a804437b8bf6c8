//! The effect-ranking oracle consumed by stability selection.
pub mod score_gain;

pub use score_gain::ScoreGainRanker;

use crate::data::{DataSet, VariableId};
use crate::error::Result;

/// Orders the non-target variables of `data` by decreasing estimated effect
/// on `target`. Called concurrently from bootstrap tasks, each with its own
/// subsample.
pub trait EffectRanker: Send + Sync {
    fn rank(&self, data: &DataSet, target: VariableId) -> Result<Vec<VariableId>>;
}

impl<F> EffectRanker for F
where
    F: Fn(&DataSet, VariableId) -> Result<Vec<VariableId>> + Send + Sync,
{
    fn rank(&self, data: &DataSet, target: VariableId) -> Result<Vec<VariableId>> {
        self(data, target)
    }
}
