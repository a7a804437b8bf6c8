//! Baseline ranker: single-parent score gain under the BIC score.
use super::EffectRanker;
use crate::data::{DataSet, VariableId};
use crate::error::Result;
use crate::score::{Score, ScoreConfig, SemBicScore};
use std::sync::Arc;
use tracing::debug;

/// Ranks each candidate by how much adding it as the sole parent of the
/// target improves the local score. Ties keep data set order. Gains that are
/// undefined on a given sample (a constant column, say) sort last.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreGainRanker {
    pub config: ScoreConfig,
}

impl ScoreGainRanker {
    pub fn new(config: ScoreConfig) -> Self { Self { config } }

    pub fn gains(&self, data: &DataSet, target: VariableId) -> Result<Vec<(VariableId, f64)>> {
        let score = SemBicScore::from_dataset(Arc::new(data.clone()))?.with_config(self.config)?;
        data.variable_ids()
            .filter(|&v| v != target)
            .map(|v| match score.local_score_diff(v.index(), target.index(), &[]) {
                Ok(gain) => Ok((v, gain)),
                Err(e) if e.is_numerical() => {
                    debug!(candidate = %data.variable(v).name, error = %e, "gain undefined");
                    Ok((v, f64::NAN))
                }
                Err(e) => Err(e),
            })
            .collect()
    }
}

impl EffectRanker for ScoreGainRanker {
    fn rank(&self, data: &DataSet, target: VariableId) -> Result<Vec<VariableId>> {
        let mut gains = self.gains(data, target)?;
        gains.sort_by(|(_, a), (_, b)| match (a.is_nan(), b.is_nan()) {
            (false, false) => b.total_cmp(a),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        });
        Ok(gains.into_iter().map(|(v, _)| v).collect())
    }
}
