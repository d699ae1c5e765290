use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Simulate linear regression data and estimate the bootstrap standard error
/// of the OLS slope.
#[derive(Debug, Clone, Parser)]
#[command(name = "riskmeasures", version)]
pub struct Args {
    /// Number of observations to simulate
    #[arg(
        long = "N",
        required_unless_present = "data",
        conflicts_with = "data",
        allow_negative_numbers = true
    )]
    pub n: Option<i64>,

    /// Number of bootstrap resamples
    #[arg(long = "B", allow_negative_numbers = true)]
    pub b: i64,

    /// True intercept
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub beta0: f64,

    /// True slope
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub beta1: f64,

    /// Standard deviation of x
    #[arg(long = "x-sigma", default_value_t = 1.0, allow_negative_numbers = true)]
    pub x_sigma: f64,

    /// Standard deviation of the noise
    #[arg(long = "eps-sigma", default_value_t = 1.0, allow_negative_numbers = true)]
    pub eps_sigma: f64,

    /// Seed for both the simulation and the bootstrap, random when absent
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Evaluate the bootstrap resamples in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Number of parallel jobs, used with --parallel
    #[arg(long = "n-jobs", default_value_t = 1, allow_negative_numbers = true)]
    pub n_jobs: i64,

    /// Path to write the JSON result
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Path to write the dataset as CSV
    #[arg(long = "save-data")]
    pub save_data: Option<PathBuf>,

    /// Save the result and the dataset to a timestamped artifacts directory
    #[arg(long)]
    pub log: bool,

    /// Root of the timestamped directories created by --log
    #[arg(long = "artifacts-dir", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,

    /// Logging verbosity
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Load an `x,y` CSV dataset instead of simulating one
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["riskmeasures", "--N", "200", "--B", "1000"]).unwrap();

        assert_eq!(args.n, Some(200));
        assert_eq!(args.b, 1000);
        assert_eq!((args.beta0, args.beta1), (1., 2.));
        assert_eq!((args.x_sigma, args.eps_sigma), (1., 1.));
        assert_eq!(args.seed, None);
        assert!(!args.parallel && !args.log);
        assert_eq!(args.n_jobs, 1);
        assert_eq!(args.artifacts_dir, PathBuf::from("artifacts"));
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn full_flag_set() {
        let args = Args::try_parse_from([
            "riskmeasures", "--N", "50", "--B", "20", "--beta0", "-1.5", "--beta1", "0.5",
            "--x-sigma", "2", "--eps-sigma", "0.1", "--seed", "17", "--parallel", "--n-jobs", "4",
            "--out", "r.json", "--save-data", "d.csv", "--log", "--log-level", "WARNING",
        ])
        .unwrap();

        assert_eq!(args.beta0, -1.5);
        assert_eq!(args.seed, Some(17));
        assert!(args.parallel && args.log);
        assert_eq!(args.n_jobs, 4);
        assert_eq!(args.out, Some(PathBuf::from("r.json")));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Warn);
    }

    #[test]
    fn negative_values_reach_validation() {
        let args = Args::try_parse_from(["riskmeasures", "--N", "-3", "--B", "5"]).unwrap();
        assert_eq!(args.n, Some(-3));
    }

    #[test]
    fn missing_required_flags() {
        let err = Args::try_parse_from(["riskmeasures", "--B", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);

        let err = Args::try_parse_from(["riskmeasures", "--N", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn data_replaces_n() {
        let args = Args::try_parse_from(["riskmeasures", "--data", "in.csv", "--B", "5"]).unwrap();
        assert_eq!(args.n, None);
        assert_eq!(args.data, Some(PathBuf::from("in.csv")));

        let err = Args::try_parse_from(["riskmeasures", "--data", "in.csv", "--N", "3", "--B", "5"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn unknown_log_level() {
        assert!(
            Args::try_parse_from(["riskmeasures", "--N", "5", "--B", "5", "--log-level", "TRACE"])
                .is_err()
        );
    }
}
