//! The undirected graph a stability run reports.
pub mod neighborhood;

pub use neighborhood::CausalNeighborhood;
