//! Variables, data sets, and row subsampling.
pub mod dataset;
pub mod sampler;
pub mod variable;

pub use dataset::DataSet;
pub use sampler::{task_rng, BootstrapSampler, Subsampler};
pub use variable::{Variable, VariableId, VariableKind};
