use std::{num::NonZeroUsize, path::PathBuf};

use bootstrap_core::{
    Execution, SimulationParams, ValidationErr,
    validation::{self, MIN_ROWS, MIN_SE_RESAMPLES},
};

use crate::{args::Args, error::Result};

/// Where a run gets its dataset from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Simulate `rows` observations from the configured model.
    Simulate { rows: usize },
    /// Load an `x,y` CSV file.
    Load { path: PathBuf },
}

/// The model parameters of a run.
///
/// They drive the simulation and are recorded in the result even when the
/// dataset is loaded from a file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    pub beta0: f64,
    pub beta1: f64,
    pub x_sigma: f64,
    pub eps_sigma: f64,
}

/// Immutable, validated configuration of a command line run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    source: DataSource,
    model: ModelConfig,
    resamples: usize,
    seed: Option<u64>,
    parallel: bool,
    jobs: NonZeroUsize,
    out: Option<PathBuf>,
    save_data: Option<PathBuf>,
    artifacts_dir: Option<PathBuf>,
}

impl RunConfig {
    /// Validates the parsed command line into a `RunConfig`.
    ///
    /// Arguments are checked in a fixed order and the first invalid one is
    /// reported by name.
    ///
    /// # Arguments
    /// * `args` - The parsed command line.
    ///
    /// # Returns
    /// The configuration or a `CliErr` wrapping a `ValidationErr`.
    pub fn from_args(args: &Args) -> Result<Self> {
        let source = match (&args.data, args.n) {
            (Some(path), _) => DataSource::Load { path: path.clone() },
            (None, Some(n)) => DataSource::Simulate {
                rows: validation::validate_count("N", n, MIN_ROWS)?,
            },
            (None, None) => {
                return Err(ValidationErr::BelowMinimum {
                    name: "N",
                    got: 0,
                    min: MIN_ROWS as i64,
                }
                .into());
            }
        };

        let resamples = validation::validate_count("B", args.b, MIN_SE_RESAMPLES)?;
        let jobs = validation::validate_count("n_jobs", args.n_jobs, 1)?;
        let model = ModelConfig {
            x_sigma: validation::validate_positive("x_sigma", args.x_sigma)?,
            eps_sigma: validation::validate_positive("eps_sigma", args.eps_sigma)?,
            beta0: validation::validate_finite("beta0", args.beta0)?,
            beta1: validation::validate_finite("beta1", args.beta1)?,
        };
        let seed = validation::validate_optional_seed(args.seed)?;

        Ok(Self {
            source,
            model,
            resamples,
            seed,
            parallel: args.parallel,
            jobs: NonZeroUsize::new(jobs).unwrap_or(NonZeroUsize::MIN),
            out: args.out.clone(),
            save_data: args.save_data.clone(),
            artifacts_dir: args.log.then(|| args.artifacts_dir.clone()),
        })
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn model(&self) -> ModelConfig {
        self.model
    }

    /// Returns the simulation parameters for `rows` observations.
    pub fn simulation(&self, rows: usize) -> Result<SimulationParams> {
        let m = self.model;
        Ok(SimulationParams::new(rows, m.beta0, m.beta1, m.x_sigma, m.eps_sigma)?)
    }

    pub fn resamples(&self) -> usize {
        self.resamples
    }

    /// Returns the requested seed, `None` if one must be chosen at run time.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn jobs(&self) -> NonZeroUsize {
        self.jobs
    }

    /// Returns how the bootstrap resamples are evaluated.
    pub fn execution(&self) -> Execution {
        Execution::from_flags(self.parallel, self.jobs)
    }

    pub fn out(&self) -> Option<&PathBuf> {
        self.out.as_ref()
    }

    pub fn save_data(&self) -> Option<&PathBuf> {
        self.save_data.as_ref()
    }

    /// Returns the artifacts root when `--log` was given.
    pub fn artifacts_dir(&self) -> Option<&PathBuf> {
        self.artifacts_dir.as_ref()
    }

    /// Whether the result must be printed to stdout.
    pub fn prints_result(&self) -> bool {
        self.out.is_none() && self.artifacts_dir.is_none()
    }
}
