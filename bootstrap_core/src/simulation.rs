use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    dataset::Dataset,
    error::{Result, ValidationErr},
    random::Seeding,
    validation::{self, MIN_ROWS},
};

/// The parameters of the linear model `y = beta0 + beta1 * x + eps`, where
/// `x ~ N(0, x_sigma²)` and `eps ~ N(0, eps_sigma²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    n: usize,
    beta0: f64,
    beta1: f64,
    x_sigma: f64,
    eps_sigma: f64,
}

impl SimulationParams {
    /// Creates a new `SimulationParams`.
    ///
    /// # Arguments
    /// * `n` - The amount of observations, at least 2.
    /// * `beta0` - The true intercept.
    /// * `beta1` - The true slope.
    /// * `x_sigma` - The standard deviation of `x`, finite and positive.
    /// * `eps_sigma` - The standard deviation of the noise, finite and positive.
    ///
    /// # Returns
    /// The parameters or a `ValidationErr` naming the first invalid one.
    pub fn new(n: usize, beta0: f64, beta1: f64, x_sigma: f64, eps_sigma: f64) -> Result<Self> {
        Ok(Self {
            n: validation::check_count("N", n, MIN_ROWS)?,
            beta0: validation::validate_finite("beta0", beta0)?,
            beta1: validation::validate_finite("beta1", beta1)?,
            x_sigma: validation::validate_positive("x_sigma", x_sigma)?,
            eps_sigma: validation::validate_positive("eps_sigma", eps_sigma)?,
        })
    }

    /// Creates a new `SimulationParams` with the default model
    /// `beta0 = 1`, `beta1 = 2` and unit standard deviations.
    pub fn with_defaults(n: usize) -> Result<Self> {
        Self::new(n, 1., 2., 1., 1.)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn beta0(&self) -> f64 {
        self.beta0
    }

    pub fn beta1(&self) -> f64 {
        self.beta1
    }

    pub fn x_sigma(&self) -> f64 {
        self.x_sigma
    }

    pub fn eps_sigma(&self) -> f64 {
        self.eps_sigma
    }
}

/// Simulates a dataset under the linear model described by `params`.
///
/// All `n` predictor values are drawn first and then all `n` noise terms, so
/// for a given stream the predictors don't depend on `eps_sigma`.
///
/// Passing `Seeding::Reseed` makes the draw bit-identical across calls with
/// the same seed. `Seeding::Continue` advances the caller's stream, so anyone
/// reseeding that stream afterwards restarts the sequence for later draws.
///
/// # Arguments
/// * `params` - The validated model parameters.
/// * `seeding` - Where the randomness comes from.
///
/// # Returns
/// The simulated dataset.
pub fn simulate(params: &SimulationParams, seeding: Seeding<'_>) -> Result<Dataset> {
    let x_dist = normal("x_sigma", params.x_sigma)?;
    let eps_dist = normal("eps_sigma", params.eps_sigma)?;

    let (xs, ys) = seeding.with_rng(|rng| draw(params, &x_dist, &eps_dist, rng));
    Dataset::new(xs, ys)
}

fn normal(name: &'static str, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(0., std_dev).map_err(|_| ValidationErr::NotPositive { name, got: std_dev }.into())
}

fn draw<R: Rng>(
    params: &SimulationParams,
    x_dist: &Normal<f64>,
    eps_dist: &Normal<f64>,
    rng: &mut R,
) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = (0..params.n).map(|_| x_dist.sample(rng)).collect();
    let ys = xs
        .iter()
        .map(|&x| params.beta0 + params.beta1 * x + eps_dist.sample(rng))
        .collect();

    (xs, ys)
}
