//! Row subsampling for bootstrap iterations.
use super::dataset::DataSet;
use crate::error::{CausalError, Result};
use rand::seq::index;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Draws a new data set of `row_count` rows from `data`.
pub trait Subsampler: Send + Sync {
    fn sample(&self, data: &DataSet, row_count: usize, rng: &mut dyn RngCore) -> Result<DataSet>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapSampler {
    pub without_replacement: bool,
}

impl Default for BootstrapSampler {
    fn default() -> Self { Self { without_replacement: true } }
}

impl BootstrapSampler {
    pub fn without_replacement() -> Self { Self { without_replacement: true } }
    pub fn with_replacement() -> Self { Self { without_replacement: false } }
}

impl Subsampler for BootstrapSampler {
    fn sample(&self, data: &DataSet, row_count: usize, rng: &mut dyn RngCore) -> Result<DataSet> {
        let total = data.num_rows();
        let rows: Vec<usize> = if self.without_replacement {
            if row_count > total {
                return Err(CausalError::invalid_configuration(format!(
                    "Cannot draw {} rows without replacement from {}", row_count, total
                )));
            }
            index::sample(rng, total, row_count).into_vec()
        } else {
            if total == 0 && row_count > 0 {
                return Err(CausalError::invalid_argument("Cannot resample an empty data set"));
            }
            (0..row_count).map(|_| rng.gen_range(0..total)).collect()
        };
        data.select_rows(&rows)
    }
}

/// Independent stream for one task, derived from a run-level seed.
pub fn task_rng(run_seed: u64, task: u64) -> ChaCha20Rng {
    let seed = run_seed.wrapping_add(task.wrapping_mul(0x9e3779b97f4a7c15));
    ChaCha20Rng::seed_from_u64(seed)
}
