//! Sweep driver: draws experiment configurations from a [`ConfigSpace`],
//! runs each through the diffusion pipeline and folds the outcomes into a
//! [`Report`].

pub mod config;
pub mod experiment;
pub mod report;

pub use config::{
    ConfigSpace, ExperimentConfig, InitialCondition, IntegratorKind, TopologyFamily, UniformRange,
};
pub use experiment::{run_experiment, RunRecord, RunStatus};
pub use report::{KindSummary, PassRate, Report, SummaryStats, Tally};

use netdiff_core::ConfigurationError;
use rayon::prelude::*;
use std::time::Instant;

/// Runs `runs` sampled experiments, in parallel unless told otherwise.
#[derive(Clone, Debug)]
pub struct Driver {
    pub space: ConfigSpace,
    pub runs: usize,
    pub seed: u64,
    pub parallel: bool,
}

impl Driver {
    pub fn new(space: ConfigSpace, runs: usize, seed: u64) -> Self {
        Self { space, runs, seed, parallel: true }
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Configuration for every run id, in order.
    pub fn configurations(&self) -> Result<Vec<ExperimentConfig>, ConfigurationError> {
        self.space.validate()?;
        (0..self.runs as u64)
            .map(|id| self.space.sample(self.seed, id))
            .collect()
    }

    pub fn run(&self) -> Result<Report, ConfigurationError> {
        let configs = self.configurations()?;
        let started = Instant::now();
        tracing::info!(runs = configs.len(), seed = self.seed, parallel = self.parallel, "starting sweep");

        let tally = if self.parallel {
            configs
                .par_iter()
                .enumerate()
                .try_fold(Tally::new, |mut tally, (id, config)| {
                    tally.push(run_experiment(config, id as u64)?);
                    Ok::<_, ConfigurationError>(tally)
                })
                .try_reduce(Tally::new, |a, b| Ok(a.merge(b)))?
        } else {
            let mut tally = Tally::new();
            for (id, config) in configs.iter().enumerate() {
                tally.push(run_experiment(config, id as u64)?);
            }
            tally
        };

        let report = tally.finish(self.space.success_threshold, started.elapsed());
        tracing::info!(
            runs = report.total_runs,
            successes = report.successes,
            mean_r2 = report.r_squared.mean,
            secs = report.wall_clock_secs,
            "sweep finished"
        );
        Ok(report)
    }
}
