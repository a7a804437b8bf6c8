//! Bootstrap stability selection of a target's causal neighborhood.
pub mod config;
pub mod counts;
pub mod cstar;
pub mod result;

pub use config::{CStarConfig, ResolvedRun};
pub use counts::SelectionCounts;
pub use cstar::CStar;
pub use result::{FrequencyTable, SelectionFrequency, StabilityResult};
