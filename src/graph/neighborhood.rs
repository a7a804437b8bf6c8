//! neighborhood.rs
//! Undirected output graph of a stability run: every variable of the data set
//! is a node, node `i` is `VariableId(i)`.

use crate::data::{Variable, VariableId};
use crate::error::{CausalError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

#[derive(Debug, Clone)]
pub struct CausalNeighborhood {
    graph: UnGraph<Variable, ()>,
}

impl CausalNeighborhood {
    pub fn new(variables: &[Variable]) -> Self {
        let mut graph = UnGraph::with_capacity(variables.len(), 0);
        for v in variables {
            graph.add_node(v.clone());
        }
        Self { graph }
    }

    #[inline(always)]
    fn node(id: VariableId) -> NodeIndex { NodeIndex::new(id.index()) }

    /// Adds an undirected edge; repeated edges are ignored.
    pub fn add_edge(&mut self, a: VariableId, b: VariableId) -> Result<()> {
        for id in [a, b] {
            if id.index() >= self.graph.node_count() {
                return Err(CausalError::invalid_argument(format!(
                    "Variable id {} out of range for {} nodes", id.0, self.graph.node_count()
                )));
            }
        }
        if !self.has_edge(a, b) {
            self.graph.add_edge(Self::node(a), Self::node(b), ());
        }
        Ok(())
    }

    pub fn has_edge(&self, a: VariableId, b: VariableId) -> bool {
        self.graph.find_edge(Self::node(a), Self::node(b)).is_some()
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }
    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> { self.graph.node_weight(Self::node(id)) }

    /// Adjacent variables in ascending id order.
    pub fn neighbors(&self, id: VariableId) -> Vec<VariableId> {
        let mut out: Vec<VariableId> = self.graph
            .neighbors(Self::node(id))
            .map(|n| VariableId::new(n.index()))
            .collect();
        out.sort();
        out
    }

    /// Edges as name pairs, each ordered by variable id, sorted.
    pub fn edges_by_name(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(NodeIndex, NodeIndex)> = self.graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source(), e.target());
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(a, b)| (self.graph[a].name.clone(), self.graph[b].name.clone()))
            .collect()
    }

    pub fn as_graph(&self) -> &UnGraph<Variable, ()> { &self.graph }
}
