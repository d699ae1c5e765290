//! Bootstrap estimation of the standard error of an OLS slope.
//!
//! The crate simulates data from `y = β₀ + β₁ x + ε`, fits the line by
//! ordinary least squares and estimates the sampling variability of the slope
//! by resampling the observations with replacement.

pub mod aggregation;
pub mod dataset;
pub mod error;
pub mod moments;
pub mod ols;
pub mod random;
pub mod resampling;
pub mod simulation;
pub mod validation;

pub use aggregation::{Execution, bootstrap_beta, bootstrap_moments, bootstrap_slopes, sample_std};
pub use dataset::{Dataset, Observation};
pub use error::{EstimationErr, Result, ValidationErr};
pub use moments::RunningMoments;
pub use ols::{Coefficients, estimate_beta};
pub use random::{RandomSource, Seeding, entropy_seed};
pub use resampling::{ResamplePlan, Resamples, bootstrap_indices, bootstrap_samples};
pub use simulation::{SimulationParams, simulate};
