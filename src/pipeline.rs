//! Runs a configured estimation end to end.

use std::{io::Write, path::PathBuf, time::Instant};

use bootstrap_core::{Dataset, Seeding, bootstrap_beta, entropy_seed, estimate_beta, simulate};
use chrono::Local;
use log::info;

use crate::{
    artifacts::{self, DATA_FILE, RESULT_FILE, RunInputs, RunMeta, RunOutputs, RunReport},
    config::{DataSource, RunConfig},
    error::{CliErr, Result},
};

/// Simulates or loads the dataset, fits it, bootstraps the slope's standard
/// error and persists everything the configuration asks for.
///
/// A single seed drives both the simulation and the bootstrap, each starting
/// a fresh stream from it. When none is configured one is drawn from entropy,
/// logged and recorded in the result.
///
/// # Arguments
/// * `config` - The validated run configuration.
/// * `stdout` - Where the result JSON goes when no output file was requested.
///
/// # Returns
/// The result artifact of the run.
pub fn run<W: Write>(config: &RunConfig, stdout: &mut W) -> Result<RunReport> {
    let start = Instant::now();

    let seed = config.seed().unwrap_or_else(entropy_seed);
    info!(seed = seed, chosen = config.seed().is_none(); "resolved seed");

    let run_dir = config
        .artifacts_dir()
        .map(|root| artifacts::timestamped_dir(root, Local::now()));
    if let Some(dir) = &run_dir {
        info!("logging enabled: saving to {}", dir.display());
    }

    let data = load_dataset(config, seed)?;

    let beta_hat = estimate_beta(&data)?;
    info!(
        beta0_hat = beta_hat.intercept(),
        beta1_hat = beta_hat.slope();
        "ols estimates"
    );

    let execution = config.execution();
    info!(
        resamples = config.resamples(),
        parallel = config.parallel(),
        jobs = execution.shards(),
        seed = seed;
        "bootstrapping"
    );
    let se = bootstrap_beta(&data, config.resamples(), Seeding::Reseed(seed), execution)?;
    info!(se_boot_beta1 = se; "bootstrap standard error");

    if let Some(path) = config.save_data() {
        artifacts::write_csv(path, &data)?;
        info!("saved data to {}", path.display());
    }
    if let Some(dir) = &run_dir {
        let path = dir.join(DATA_FILE);
        artifacts::write_csv(&path, &data)?;
        info!("saved data to {}", path.display());
    }

    let model = config.model();
    let report = RunReport {
        inputs: RunInputs {
            n: data.len(),
            b: config.resamples(),
            beta0: model.beta0,
            beta1: model.beta1,
            x_sigma: model.x_sigma,
            eps_sigma: model.eps_sigma,
            seed: Some(seed),
            parallel: config.parallel(),
            n_jobs: config.jobs().get(),
            data: loaded_path(config),
        },
        outputs: RunOutputs {
            beta_hat: beta_hat.to_array(),
            se_boot_beta1: se,
        },
        meta: RunMeta::now(u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)),
    };

    if let Some(path) = config.out() {
        artifacts::write_json(path, &report)?;
        info!("wrote results to {}", path.display());
    }
    if let Some(dir) = &run_dir {
        let path = dir.join(RESULT_FILE);
        artifacts::write_json(&path, &report)?;
        info!("wrote results to {}", path.display());
    }
    if config.prints_result() {
        writeln!(stdout, "{}", artifacts::to_json(&report)?)
            .map_err(|e| CliErr::io("<stdout>", e))?;
    }

    Ok(report)
}

fn load_dataset(config: &RunConfig, seed: u64) -> Result<Dataset> {
    match config.source() {
        DataSource::Simulate { rows } => {
            let params = config.simulation(*rows)?;
            info!(
                n = params.n(),
                beta0 = params.beta0(),
                beta1 = params.beta1(),
                x_sigma = params.x_sigma(),
                eps_sigma = params.eps_sigma(),
                seed = seed;
                "simulating data"
            );
            Ok(simulate(&params, Seeding::Reseed(seed))?)
        }
        DataSource::Load { path } => {
            let data = artifacts::read_csv(path)?;
            info!(rows = data.len(); "loaded data from {}", path.display());
            Ok(data)
        }
    }
}

fn loaded_path(config: &RunConfig) -> Option<PathBuf> {
    match config.source() {
        DataSource::Load { path } => Some(path.clone()),
        DataSource::Simulate { .. } => None,
    }
}
