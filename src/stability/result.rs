//! Frequencies and the thresholded neighborhood of a stability run.
use crate::data::{Variable, VariableId};
use crate::error::{CausalError, Result};
use crate::graph::CausalNeighborhood;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionFrequency {
    pub variable: VariableId,
    pub name: String,
    pub count: u32,
    pub frequency: f64,
}

/// Per-candidate selection counts over a run, in candidate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub target: VariableId,
    pub target_name: String,
    pub num_subsamples: usize,
    pub entries: Vec<SelectionFrequency>,
}

impl FrequencyTable {
    pub fn new(
        variables: &[Variable],
        target: VariableId,
        candidates: &[VariableId],
        counts: &[u32],
        num_subsamples: usize,
    ) -> Result<Self> {
        if num_subsamples == 0 {
            return Err(CausalError::invalid_configuration("Frequencies need at least one subsample"));
        }
        if candidates.len() != counts.len() {
            return Err(CausalError::invalid_argument(format!(
                "{} counts for {} candidates", counts.len(), candidates.len()
            )));
        }
        let name_of = |v: VariableId| {
            variables.get(v.index()).map(|var| var.name.clone()).ok_or_else(|| {
                CausalError::invalid_argument(format!(
                    "Variable id {} out of range for {} variables", v.0, variables.len()
                ))
            })
        };
        let entries = candidates
            .iter()
            .zip(counts)
            .map(|(&v, &count)| {
                Ok(SelectionFrequency {
                    variable: v,
                    name: name_of(v)?,
                    count,
                    frequency: count as f64 / num_subsamples as f64,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            target,
            target_name: name_of(target)?,
            num_subsamples,
            entries,
        })
    }

    pub fn frequency(&self, variable: VariableId) -> Option<f64> {
        self.entries.iter().find(|e| e.variable == variable).map(|e| e.frequency)
    }

    /// Entries by descending count; equal counts keep candidate order.
    pub fn ranked(&self) -> Vec<&SelectionFrequency> {
        let mut ranked: Vec<&SelectionFrequency> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// Candidates whose frequency is strictly above `threshold`.
    pub fn selected(&self, threshold: f64) -> Vec<VariableId> {
        self.entries.iter().filter(|e| e.frequency > threshold).map(|e| e.variable).collect()
    }

    /// All variables as nodes, plus an edge from the target to each selected candidate.
    pub fn neighborhood(&self, variables: &[Variable], threshold: f64) -> Result<CausalNeighborhood> {
        let mut graph = CausalNeighborhood::new(variables);
        for v in self.selected(threshold) {
            graph.add_edge(v, self.target)?;
        }
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CausalError::invalid_argument(format!("Cannot serialize frequencies: {}", e)))
    }
}

#[derive(Debug, Clone)]
pub struct StabilityResult {
    pub frequencies: FrequencyTable,
    pub pi_threshold: f64,
    pub graph: CausalNeighborhood,
}

impl StabilityResult {
    pub fn new(frequencies: FrequencyTable, variables: &[Variable], pi_threshold: f64) -> Result<Self> {
        let graph = frequencies.neighborhood(variables, pi_threshold)?;
        Ok(Self { frequencies, pi_threshold, graph })
    }

    pub fn selected(&self) -> Vec<VariableId> {
        self.frequencies.selected(self.pi_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vars() -> Vec<Variable> {
        ["Y", "A", "B", "C"].iter().map(|s| Variable::continuous(*s)).collect()
    }

    fn table(counts: &[u32], n: usize) -> FrequencyTable {
        let candidates: Vec<VariableId> = (1..4).map(VariableId::new).collect();
        FrequencyTable::new(&vars(), VariableId(0), &candidates, counts, n).unwrap()
    }

    #[test]
    fn test_zero_subsamples_never_divides() {
        let err = FrequencyTable::new(&vars(), VariableId(0), &[VariableId(1)], &[0], 0).unwrap_err();
        assert!(matches!(err, CausalError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_unknown_ids_are_invalid_arguments() {
        let err = FrequencyTable::new(&vars(), VariableId(0), &[VariableId(9)], &[1], 2).unwrap_err();
        assert!(matches!(err, CausalError::InvalidArgument { .. }));
        let err = FrequencyTable::new(&vars(), VariableId(4), &[VariableId(1)], &[1], 2).unwrap_err();
        assert!(err.to_string().contains("out of range"), "Msg: {}", err);

        let t = table(&[9, 1, 2], 10);
        assert!(t.neighborhood(&vars()[..2], 0.0).is_err());
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let t = table(&[3, 7, 3], 10);
        let names: Vec<&str> = t.ranked().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let t = table(&[5, 6, 0], 10);
        assert_eq!(t.selected(0.5), vec![VariableId(2)]);
        assert_eq!(t.selected(0.0), vec![VariableId(1), VariableId(2)]);
    }

    #[test]
    fn test_neighborhood_keeps_all_nodes() {
        let t = table(&[9, 1, 2], 10);
        let g = t.neighborhood(&vars(), 0.5).unwrap();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edges_by_name(), vec![("Y".to_string(), "A".to_string())]);
    }

    #[test]
    fn test_json_round_trip_keeps_entries() {
        let t = table(&[1, 2, 3], 4);
        let back: FrequencyTable = serde_json::from_str(&t.to_json().unwrap()).unwrap();
        assert_eq!(back, t);
    }

    proptest! {
        #[test]
        fn prop_raising_threshold_never_adds_edges(
            n in 1usize..200,
            raw in prop::collection::vec(0u32..1000, 3),
            lo in 0.0f64..1.0,
            hi in 0.0f64..1.0,
        ) {
            let counts: Vec<u32> = raw.iter().map(|c| c % (n as u32 + 1)).collect();
            let t = table(&counts, n);
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            let (strict, loose) = (t.neighborhood(&vars(), hi).unwrap(), t.neighborhood(&vars(), lo).unwrap());
            prop_assert!(strict.edge_count() <= loose.edge_count());
            prop_assert!(t.entries.iter().all(|e| (0.0..=1.0).contains(&e.frequency)));
        }
    }
}
