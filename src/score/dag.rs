//! Total score of a DAG as the sum of its local scores.
use super::Score;
use crate::data::VariableId;
use crate::error::{CausalError, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use petgraph::Direction;

/// Sums `local_score(node, parents(node))` over every node of `dag`. Node
/// weights name the score's variables.
pub fn score_dag<S: Score + ?Sized>(score: &S, dag: &DiGraph<VariableId, ()>) -> Result<f64> {
    if is_cyclic_directed(dag) {
        return Err(CausalError::invalid_argument("Cannot score a graph with a directed cycle"));
    }

    let mut total = 0.0;
    for node in dag.node_indices() {
        let parents: Vec<usize> = dag
            .neighbors_directed(node, Direction::Incoming)
            .map(|p| dag[p].index())
            .collect();
        total += score.local_score(dag[node].index(), &parents)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSet, Variable};
    use crate::score::SemBicScore;
    use std::sync::Arc;

    fn score() -> SemBicScore {
        let vars = ["A", "B", "C"].iter().map(|s| Variable::continuous(*s)).collect();
        let a: Vec<f64> = (0..60).map(|i| ((i * 13 % 17) as f64) - 8.0).collect();
        let b: Vec<f64> = a.iter().enumerate().map(|(i, v)| 1.5 * v + ((i * 5 % 7) as f64 - 3.0)).collect();
        let c: Vec<f64> = (0..60).map(|i| ((i * 11 % 23) as f64) - 11.0).collect();
        SemBicScore::from_dataset(Arc::new(DataSet::from_columns(vars, vec![a, b, c]).unwrap())).unwrap()
    }

    #[test]
    fn test_dag_score_is_sum_of_local_scores() {
        let score = score();
        let mut dag = DiGraph::new();
        let a = dag.add_node(VariableId(0));
        let b = dag.add_node(VariableId(1));
        dag.add_node(VariableId(2));
        dag.add_edge(a, b, ());

        let expected = score.local_score(0, &[]).unwrap()
            + score.local_score(1, &[0]).unwrap()
            + score.local_score(2, &[]).unwrap();
        assert!((score_dag(&score, &dag).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cycle_is_rejected() {
        let score = score();
        let mut dag = DiGraph::new();
        let a = dag.add_node(VariableId(0));
        let b = dag.add_node(VariableId(1));
        dag.add_edge(a, b, ());
        dag.add_edge(b, a, ());
        let err = score_dag(&score, &dag).unwrap_err();
        assert!(err.to_string().contains("cycle"), "Msg: {}", err);
    }
}
