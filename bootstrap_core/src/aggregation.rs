//! Reduces the bootstrap ensemble to the standard error of the slope.

use std::{num::NonZeroUsize, ops::Range};

use log::debug;
use rayon::prelude::*;

use crate::{
    dataset::Dataset,
    error::{Result, ValidationErr},
    moments::RunningMoments,
    ols,
    random::Seeding,
    resampling::{ResamplePlan, Resamples},
    validation::{self, MIN_SE_RESAMPLES},
};

/// How the resamples of a bootstrap are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Execution {
    /// Every resample on the calling thread, in order.
    #[default]
    Sequential,
    /// The resamples split in `jobs` contiguous shards evaluated on the rayon pool.
    Parallel { jobs: NonZeroUsize },
}

impl Execution {
    /// Builds an `Execution` out of the command line pair `--parallel/--n-jobs`.
    ///
    /// # Arguments
    /// * `parallel` - Whether parallel evaluation was requested.
    /// * `jobs` - The amount of shards, ignored when not parallel.
    pub fn from_flags(parallel: bool, jobs: NonZeroUsize) -> Self {
        match parallel {
            true => Execution::Parallel { jobs },
            false => Execution::Sequential,
        }
    }

    /// The amount of shards the resamples are split in.
    pub fn shards(&self) -> usize {
        match self {
            Execution::Sequential => 1,
            Execution::Parallel { jobs } => jobs.get(),
        }
    }
}

/// Splits `total` resamples among `shards` and returns the range of `shard`.
///
/// Ranges are contiguous, disjoint, cover `0..total` and their sizes differ
/// by at most one.
fn shard_range(total: usize, shard: usize, shards: usize) -> Range<usize> {
    let base = total / shards;
    let rem = total % shards;

    let start = shard * base + shard.min(rem);
    let extra = usize::from(shard < rem);
    start..start + base + extra
}

/// Returns the sample standard deviation of `values` (divisor `n - 1`).
///
/// Two passes over the data: the mean first, then the squared deviations.
///
/// # Arguments
/// * `values` - At least two reals.
///
/// # Returns
/// The standard deviation or `ValidationErr::TooFewValues`.
pub fn sample_std(values: &[f64]) -> Result<f64> {
    if values.len() < MIN_SE_RESAMPLES {
        return Err(ValidationErr::TooFewValues {
            got: values.len(),
            min: MIN_SE_RESAMPLES,
        }
        .into());
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

    Ok((ss / (n - 1.)).sqrt())
}

/// Folds the slopes of the resamples in `range` into a fresh accumulator.
fn fold_shard(data: &Dataset, plan: ResamplePlan, range: Range<usize>) -> Result<RunningMoments> {
    let mut moments = RunningMoments::new();

    for sample in Resamples::new(data, plan, range)? {
        moments.push(ols::estimate_beta(&sample?)?.slope());
    }

    Ok(moments)
}

/// Streams the bootstrap slope estimates into their running moments.
///
/// Only `O(N)` memory per shard is held at once. The result is bit-identical
/// for a given seed, dataset, `B` and `Execution`, since shards are fixed by
/// the plan and merged in order.
///
/// # Arguments
/// * `data` - The original dataset.
/// * `resamples` - The amount `B` of resamples, at least 1.
/// * `seeding` - Where the master seed comes from.
/// * `execution` - Whether to evaluate the resamples in parallel.
///
/// # Returns
/// The moments or the first error, e.g. a singular resample.
pub fn bootstrap_moments(
    data: &Dataset,
    resamples: usize,
    seeding: Seeding<'_>,
    execution: Execution,
) -> Result<RunningMoments> {
    let plan = ResamplePlan::new(data.len(), resamples, seeding)?;

    match execution {
        Execution::Sequential => fold_shard(data, plan, 0..resamples),
        Execution::Parallel { jobs } => {
            let shards = jobs.get().min(resamples);
            debug!(
                resamples = resamples,
                shards = shards,
                seed = plan.seed();
                "sharding bootstrap"
            );

            let partials = (0..shards)
                .into_par_iter()
                .map(|shard| fold_shard(data, plan, shard_range(resamples, shard, shards)))
                .collect::<Result<Vec<_>>>()?;

            Ok(partials
                .iter()
                .fold(RunningMoments::new(), |mut acc, part| {
                    acc.merge(part);
                    acc
                }))
        }
    }
}

/// Estimates the standard error of the slope by the nonparametric bootstrap.
///
/// Fits the slope on each of `B` resamples and returns their sample standard
/// deviation. The point estimate of the full dataset isn't part of the result,
/// see `ols::estimate_beta`.
///
/// # Arguments
/// * `data` - The original dataset.
/// * `resamples` - The amount `B` of resamples, at least 2.
/// * `seeding` - Where the master seed comes from.
/// * `execution` - Whether to evaluate the resamples in parallel.
///
/// # Returns
/// The bootstrap standard error, or `EstimationErr::SingularMatrix` if any
/// resample happens to have a constant predictor.
pub fn bootstrap_beta(
    data: &Dataset,
    resamples: usize,
    seeding: Seeding<'_>,
    execution: Execution,
) -> Result<f64> {
    validation::check_count("B", resamples, MIN_SE_RESAMPLES)?;
    bootstrap_moments(data, resamples, seeding, execution)?.std_dev()
}

/// Returns the slope estimate of every resample, in resample order.
///
/// # Arguments
/// * `data` - The original dataset.
/// * `resamples` - The amount `B` of resamples, at least 1.
/// * `seeding` - Where the master seed comes from.
pub fn bootstrap_slopes(
    data: &Dataset,
    resamples: usize,
    seeding: Seeding<'_>,
) -> Result<Vec<f64>> {
    let plan = ResamplePlan::new(data.len(), resamples, seeding)?;

    Resamples::all(data, plan)?
        .map(|sample| Ok(ols::estimate_beta(&sample?)?.slope()))
        .collect()
}
