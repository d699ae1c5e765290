use crate::{
    error::{Result, ValidationErr},
    validation::MIN_SE_RESAMPLES,
};

/// Streaming mean and variance of a sequence of reals (Welford's method).
///
/// Accumulators built over disjoint parts of a sequence can be merged, so a
/// sequence can be folded in shards and combined afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMoments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    /// Creates a new empty `RunningMoments`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value to the accumulator.
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combines the moments of another, disjoint part of the sequence.
    ///
    /// Merging is not bit-for-bit associative, callers wanting reproducible
    /// results must merge parts in a fixed order.
    ///
    /// # Arguments
    /// * `other` - The accumulator of the part following `self`.
    pub fn merge(&mut self, other: &RunningMoments) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let (na, nb, n) = (self.count as f64, other.count as f64, count as f64);

        self.mean += delta * nb / n;
        self.m2 += other.m2 + delta * delta * na * nb / n;
        self.count = count;
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the mean of the values pushed so far, `None` if empty.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Returns the unbiased sample variance (divisor `n - 1`).
    ///
    /// # Returns
    /// The variance or `ValidationErr::TooFewValues` with fewer than 2 values.
    pub fn variance(&self) -> Result<f64> {
        if self.count < MIN_SE_RESAMPLES {
            return Err(ValidationErr::TooFewValues {
                got: self.count,
                min: MIN_SE_RESAMPLES,
            }
            .into());
        }

        // Round-off can leave m2 a hair below zero for constant sequences.
        Ok(self.m2.max(0.) / (self.count - 1) as f64)
    }

    /// Returns the sample standard deviation, the square root of `variance`.
    pub fn std_dev(&self) -> Result<f64> {
        self.variance().map(f64::sqrt)
    }
}

impl Extend<f64> for RunningMoments {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        iter.into_iter().for_each(|v| self.push(v));
    }
}

impl FromIterator<f64> for RunningMoments {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut moments = Self::new();
        moments.extend(iter);
        moments
    }
}
