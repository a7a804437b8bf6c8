//! cstar.rs
//! Causal stability ranking: bootstrap the effect ranking of every variable on
//! a target, count how often each lands in the top `q`, and keep the variables
//! selected more often than `pi_threshold`.

use super::config::CStarConfig;
use super::counts::SelectionCounts;
use super::result::{FrequencyTable, StabilityResult};
use crate::data::{task_rng, BootstrapSampler, DataSet, Subsampler};
use crate::error::{CausalError, Result};
use crate::oracle::EffectRanker;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, instrument};

pub struct CStar<R, S = BootstrapSampler> {
    ranker: R,
    sampler: S,
}

impl<R: EffectRanker> CStar<R> {
    pub fn new(ranker: R) -> Self {
        Self { ranker, sampler: BootstrapSampler::without_replacement() }
    }
}

impl<R: EffectRanker, S: Subsampler> CStar<R, S> {
    pub fn with_sampler(ranker: R, sampler: S) -> Self {
        Self { ranker, sampler }
    }

    pub fn ranker(&self) -> &R { &self.ranker }

    /// Runs every bootstrap iteration on a worker pool and returns once all of
    /// them have contributed. Any failing iteration fails the run.
    #[instrument(skip_all, fields(target = %config.target_name, subsamples = config.num_subsamples))]
    pub fn run(&self, data: &DataSet, config: &CStarConfig) -> Result<StabilityResult> {
        let run = config.resolve(data)?;
        info!(
            rows = data.num_rows(),
            subsample_rows = run.subsample_rows,
            candidates = run.candidates.len(),
            top_q = config.top_q,
            pi_threshold = config.pi_threshold,
            seed = config.seed,
            "starting stability selection"
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| CausalError::invalid_configuration(format!("Cannot build worker pool: {}", e)))?;

        let counts = SelectionCounts::new(&run.candidates);

        pool.install(|| {
            (0..config.num_subsamples).into_par_iter().try_for_each(|i| {
                let mut rng = task_rng(config.seed, i as u64);
                let sample = self.sampler
                    .sample(data, run.subsample_rows, &mut rng)
                    .map_err(|e| CausalError::SubsampleFailure { iteration: i + 1, source: Box::new(e) })?;
                let ranking = self.ranker
                    .rank(&sample, run.target)
                    .map_err(|e| CausalError::OracleFailure { iteration: i + 1, source: Box::new(e) })?;
                let selected = counts.record(&ranking, config.top_q);
                debug!(bootstrap = i + 1, of = config.num_subsamples, selected, "bootstrap complete");
                Ok::<(), CausalError>(())
            })
        })?;

        let frequencies = FrequencyTable::new(
            data.variables(),
            run.target,
            &run.candidates,
            &counts.snapshot(),
            config.num_subsamples,
        )?;

        let result = StabilityResult::new(frequencies, data.variables(), config.pi_threshold)?;
        info!(
            ranking = ?result.frequencies.ranked().iter().map(|e| (e.name.as_str(), e.frequency)).collect::<Vec<_>>(),
            edges = result.graph.edge_count(),
            "stability selection finished"
        );
        Ok(result)
    }
}
