//! Command line driver of the bootstrap OLS pipeline.
//!
//! Parses and validates the flags, runs the estimation core and persists the
//! result artifact and the dataset.

pub mod args;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod pipeline;

pub use args::{Args, LogLevel};
pub use artifacts::RunReport;
pub use config::RunConfig;
pub use error::{CliErr, Result};
