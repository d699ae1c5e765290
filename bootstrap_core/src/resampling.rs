use std::ops::Range;

use ndarray::Array2;
use rand::distr::{Distribution, Uniform};

use crate::{
    dataset::Dataset,
    error::{Result, ValidationErr},
    random::{self, Seeding},
    validation::{self, MIN_RESAMPLES, MIN_ROWS},
};

/// A deterministic plan of which rows every bootstrap resample draws.
///
/// The plan is fixed by a master seed before any resampling begins. Row `b`
/// of the conceptual `B x N` index matrix is drawn from the sub-stream
/// derived from `(seed, b)`, so any resample can be rebuilt on its own and in
/// any order, always yielding the same indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResamplePlan {
    seed: u64,
    rows: usize,
    resamples: usize,
}

impl ResamplePlan {
    /// Creates a new `ResamplePlan`.
    ///
    /// # Arguments
    /// * `rows` - The size `N` of the original dataset and of every resample.
    /// * `resamples` - The amount `B` of resamples, at least 1.
    /// * `seeding` - Where the master seed comes from.
    ///
    /// # Returns
    /// The plan or a `ValidationErr` if either size is too small.
    pub fn new(rows: usize, resamples: usize, seeding: Seeding<'_>) -> Result<Self> {
        let rows = validation::check_count("N", rows, MIN_ROWS)?;
        let resamples = validation::check_count("B", resamples, MIN_RESAMPLES)?;

        Ok(Self {
            seed: seeding.master_seed(),
            rows,
            resamples,
        })
    }

    /// Returns the master seed of this plan.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the amount of rows per resample.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the amount of resamples.
    pub fn resamples(&self) -> usize {
        self.resamples
    }

    /// Writes the row indices of resample `b` into `out`, replacing its contents.
    ///
    /// # Arguments
    /// * `b` - The resample index, in `0..resamples`.
    /// * `out` - A reusable buffer.
    pub fn fill_indices(&self, b: usize, out: &mut Vec<usize>) -> Result<()> {
        let dist = Uniform::new(0, self.rows).map_err(|_| ValidationErr::TooFewRows {
            got: self.rows,
            min: MIN_ROWS,
        })?;

        let mut rng = random::substream(self.seed, b as u64);
        out.clear();
        out.extend((0..self.rows).map(|_| dist.sample(&mut rng)));
        Ok(())
    }

    /// Returns the row indices of resample `b`.
    pub fn indices(&self, b: usize) -> Result<Vec<usize>> {
        let mut out = Vec::with_capacity(self.rows);
        self.fill_indices(b, &mut out)?;
        Ok(out)
    }

    /// Materializes the whole `B x N` index matrix.
    pub fn index_matrix(&self) -> Result<Array2<usize>> {
        let mut matrix = Array2::zeros((self.resamples, self.rows));
        let mut buf = Vec::with_capacity(self.rows);

        for (b, mut row) in matrix.rows_mut().into_iter().enumerate() {
            self.fill_indices(b, &mut buf)?;
            row.iter_mut().zip(&buf).for_each(|(cell, &i)| *cell = i);
        }

        Ok(matrix)
    }
}

/// A lazy sequence of bootstrap resamples following a `ResamplePlan`.
///
/// Only one resample is alive at a time, bounding memory to `O(N)`.
pub struct Resamples<'a> {
    data: &'a Dataset,
    plan: ResamplePlan,
    range: Range<usize>,
    buf: Vec<usize>,
}

impl<'a> Resamples<'a> {
    /// Creates a new `Resamples` over the resample indices in `range`.
    ///
    /// # Arguments
    /// * `data` - The original dataset, it must have `plan.rows()` rows.
    /// * `plan` - The plan shared by every consumer of this bootstrap.
    /// * `range` - The resample indices to produce, clamped to the plan.
    pub fn new(data: &'a Dataset, plan: ResamplePlan, range: Range<usize>) -> Result<Self> {
        if data.len() != plan.rows() {
            return Err(ValidationErr::LengthMismatch {
                x_len: data.len(),
                y_len: plan.rows(),
            }
            .into());
        }

        let end = range.end.min(plan.resamples());
        let start = range.start.min(end);

        Ok(Self {
            data,
            plan,
            range: start..end,
            buf: Vec::with_capacity(plan.rows()),
        })
    }

    /// Creates a new `Resamples` producing every resample of the plan.
    pub fn all(data: &'a Dataset, plan: ResamplePlan) -> Result<Self> {
        Self::new(data, plan, 0..plan.resamples())
    }
}

impl Iterator for Resamples<'_> {
    type Item = Result<Dataset>;

    fn next(&mut self) -> Option<Self::Item> {
        let b = self.range.next()?;

        Some(
            self.plan
                .fill_indices(b, &mut self.buf)
                .map(|_| self.data.gather(&self.buf)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

/// Draws the `B x N` bootstrap index matrix for a dataset of `rows` rows.
///
/// # Arguments
/// * `rows` - The size `N` of the dataset.
/// * `resamples` - The amount `B` of resamples, at least 1.
/// * `seeding` - Where the master seed comes from.
pub fn bootstrap_indices(
    rows: usize,
    resamples: usize,
    seeding: Seeding<'_>,
) -> Result<Array2<usize>> {
    ResamplePlan::new(rows, resamples, seeding)?.index_matrix()
}

/// Materializes `B` bootstrap resamples of `data`, each of `N` rows drawn
/// uniformly with replacement.
///
/// This keeps the whole ensemble in memory (`O(B·N)`); prefer `Resamples`
/// or the streaming aggregation for large `B`.
///
/// # Arguments
/// * `data` - The original dataset.
/// * `resamples` - The amount `B` of resamples, at least 1.
/// * `seeding` - Where the master seed comes from.
pub fn bootstrap_samples(
    data: &Dataset,
    resamples: usize,
    seeding: Seeding<'_>,
) -> Result<Vec<Dataset>> {
    let plan = ResamplePlan::new(data.len(), resamples, seeding)?;
    Resamples::all(data, plan)?.collect()
}
