//! Persistence of run results and datasets.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use bootstrap_core::{Dataset, Observation, ValidationErr};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CliErr, Result};

/// The file name of the dataset inside a timestamped artifacts directory.
pub const DATA_FILE: &str = "data.csv";

/// The file name of the result inside a timestamped artifacts directory.
pub const RESULT_FILE: &str = "result.json";

/// The inputs of a run, as recorded in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    #[serde(rename = "N")]
    pub n: usize,
    #[serde(rename = "B")]
    pub b: usize,
    pub beta0: f64,
    pub beta1: f64,
    pub x_sigma: f64,
    pub eps_sigma: f64,
    /// The seed actually used, chosen from entropy when none was given.
    pub seed: Option<u64>,
    pub parallel: bool,
    pub n_jobs: usize,
    /// The dataset file, when the data was loaded instead of simulated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutputs {
    pub beta_hat: [f64; 2],
    pub se_boot_beta1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub timestamp_utc: String,
    pub runtime_ms: u64,
    pub version: String,
}

impl RunMeta {
    /// Creates the metadata of a run finishing now.
    ///
    /// # Arguments
    /// * `runtime_ms` - The wall clock duration of the run.
    pub fn now(runtime_ms: u64) -> Self {
        Self {
            timestamp_utc: Utc::now().to_rfc3339(),
            runtime_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The result artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub inputs: RunInputs,
    pub outputs: RunOutputs,
    pub meta: RunMeta,
}

#[derive(Debug, Serialize, Deserialize)]
struct Row {
    x: f64,
    y: f64,
}

/// Creates the parent directories of `path` if they don't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| CliErr::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Returns `<root>/<YYYYmmdd_HHMMSS>` for the local time `now`.
pub fn timestamped_dir(root: &Path, now: DateTime<Local>) -> PathBuf {
    root.join(now.format("%Y%m%d_%H%M%S").to_string())
}

/// Renders the report as pretty printed JSON.
pub fn to_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the report as pretty printed JSON to `path`.
pub fn write_json(path: &Path, report: &RunReport) -> Result<()> {
    ensure_parent_dir(path)?;

    let file = File::create(path).map_err(|e| CliErr::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer).map_err(|e| CliErr::io(path, e))?;
    writer.flush().map_err(|e| CliErr::io(path, e))
}

/// Writes the dataset as an `x,y` CSV file to `path`.
pub fn write_csv(path: &Path, data: &Dataset) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path).map_err(|e| CliErr::csv(path, e))?;
    for Observation { x, y } in data.iter() {
        writer.serialize(Row { x, y }).map_err(|e| CliErr::csv(path, e))?;
    }
    writer.flush().map_err(|e| CliErr::io(path, e))
}

/// Reads an `x,y` CSV file into a validated dataset.
///
/// # Arguments
/// * `path` - A CSV file with a header row naming exactly the `x` and `y`
///   columns, in any order.
///
/// # Returns
/// The dataset, a `ValidationErr` if the table has the wrong shape, header
/// or non-finite values, or a `CliErr::Csv` if a cell can't be parsed.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| CliErr::csv(path, e))?;

    let headers = reader.headers().map_err(|e| CliErr::csv(path, e))?;
    if headers.len() != 2 {
        return Err(ValidationErr::ColumnCount { got: headers.len() }.into());
    }
    if !["x", "y"].iter().all(|name| headers.iter().any(|h| h == *name)) {
        let got = headers.iter().map(str::to_owned).collect();
        return Err(ValidationErr::ColumnNames { got }.into());
    }

    let rows = reader
        .deserialize::<Row>()
        .map(|row| row.map(|Row { x, y }| Observation { x, y }))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CliErr::csv(path, e))?;

    Ok(Dataset::from_observations(rows)?)
}
