//! Local scores for structure search.
pub mod bound;
pub mod dag;
pub mod rule;
pub mod sem_bic;

pub use bound::{BoundRiskConfig, BoundRiskScore};
pub use dag::score_dag;
pub use rule::{HighDimensionalParams, PartialCorrelationParams, SampleSizeBasis, ScoreConfig, ScoreRule};
pub use sem_bic::SemBicScore;

use crate::data::Variable;
use crate::error::{CausalError, Result};
use smallvec::SmallVec;

/// Parent index sets rarely exceed a handful of variables.
pub type ParentSet = SmallVec<[usize; 8]>;

/// A decomposable score over (variable, parent set) pairs, as consumed by a
/// greedy structure search. Implementations are immutable once configured and
/// may be queried from many threads at once.
pub trait Score: Send + Sync {
    fn local_score(&self, target: usize, parents: &[usize]) -> Result<f64>;

    /// `local_score(target, parents + x) - local_score(target, parents)`.
    fn local_score_diff(&self, x: usize, target: usize, parents: &[usize]) -> Result<f64> {
        let with_x = self.local_score(target, &with_parent(parents, x))?;
        Ok(with_x - self.local_score(target, parents)?)
    }

    fn variables(&self) -> &[Variable];

    fn sample_size(&self) -> usize;

    fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables().iter().position(|v| v.name == name)
    }

    fn is_effect_edge(&self, bump: f64) -> bool {
        bump > 0.0
    }

    fn max_degree(&self) -> usize {
        (self.sample_size() as f64).ln().ceil().max(0.0) as usize
    }

    /// True if `z` functionally determines `y`: the local score is not a
    /// finite number, or the regression behind it is singular.
    fn determines(&self, z: &[usize], y: usize) -> Result<bool> {
        match self.local_score(y, z) {
            Ok(v) => Ok(!v.is_finite()),
            Err(e) if e.is_numerical() => Ok(true),
            Err(e) => Err(e),
        }
    }
}

pub(crate) fn with_parent(parents: &[usize], x: usize) -> ParentSet {
    let mut all = ParentSet::from_slice(parents);
    all.push(x);
    all
}

/// Prefixes a numerical failure with the query it came from; other errors
/// pass through unchanged.
pub(crate) fn in_query(err: CausalError, variables: &[Variable], target: usize, parents: &[usize]) -> CausalError {
    match err {
        CausalError::NumericalFailure { context } => {
            let name = |i: usize| variables.get(i).map_or("?", |v| v.name.as_str());
            let given: Vec<&str> = parents.iter().map(|&p| name(p)).collect();
            CausalError::numerical(format!("Scoring '{}' given [{}]: {}", name(target), given.join(", "), context))
        }
        other => other,
    }
}

/// `[target, parents...]`, after checking the query is well formed.
pub(crate) fn query_indices(num_variables: usize, target: usize, parents: &[usize]) -> Result<ParentSet> {
    if target >= num_variables {
        return Err(CausalError::invalid_argument(format!(
            "Target index {} out of range for {} variables", target, num_variables
        )));
    }
    let mut all = ParentSet::with_capacity(parents.len() + 1);
    all.push(target);
    for &p in parents {
        if p >= num_variables {
            return Err(CausalError::invalid_argument(format!(
                "Parent index {} out of range for {} variables", p, num_variables
            )));
        }
        if all.contains(&p) {
            return Err(CausalError::invalid_argument(format!(
                "Index {} appears twice in the query for target {}", p, target
            )));
        }
        all.push(p);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_rejects_target_in_parents() {
        let err = query_indices(4, 1, &[0, 1]).unwrap_err();
        assert!(matches!(err, CausalError::InvalidArgument { .. }));
    }

    #[test]
    fn test_query_rejects_out_of_range() {
        assert!(query_indices(3, 3, &[]).is_err());
        assert!(query_indices(3, 0, &[5]).is_err());
    }

    #[test]
    fn test_in_query_names_target_and_parents() {
        let vars: Vec<Variable> = ["Y", "A", "B"].iter().map(|s| Variable::continuous(*s)).collect();
        let err = in_query(CausalError::numerical("singular"), &vars, 0, &[2, 1]);
        assert_eq!(err.to_string(), "Numerical failure: Scoring 'Y' given [B, A]: singular");

        let passthrough = in_query(CausalError::invalid_argument("bad"), &vars, 0, &[]);
        assert!(matches!(passthrough, CausalError::InvalidArgument { .. }));
    }

    #[test]
    fn test_query_puts_target_first() {
        let all = query_indices(5, 2, &[4, 0]).unwrap();
        assert_eq!(all.as_slice(), &[2, 4, 0]);
    }
}
