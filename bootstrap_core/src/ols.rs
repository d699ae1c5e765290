//! Closed form ordinary least squares for a single predictor.
//!
//! The normal equations `(XᵗX) β = Xᵗy` of the design matrix `X = [1, x]`
//! are solved directly in their centred form, `β₁ = Sxy / Sxx` and
//! `β₀ = ȳ - β₁ x̄`, so a large offset in `x` doesn't cancel out.

use ndarray::ArrayView1;

use crate::{
    dataset::Dataset,
    error::{EstimationErr, Result},
};

/// The fitted parameter vector `β = (β₀, β₁)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    intercept: f64,
    slope: f64,
}

impl Coefficients {
    /// Returns the intercept `β₀`.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns the slope `β₁`.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Returns `[β₀, β₁]`.
    pub fn to_array(&self) -> [f64; 2] {
        [self.intercept, self.slope]
    }
}

/// Fits `y = β₀ + β₁ x` to `data` by ordinary least squares.
///
/// # Arguments
/// * `data` - A validated dataset with at least two rows.
///
/// # Returns
/// The coefficients or `EstimationErr::SingularMatrix` if every `x` is the
/// same value, in which case `XᵗX` has no inverse.
pub fn estimate_beta(data: &Dataset) -> Result<Coefficients> {
    let singular = EstimationErr::SingularMatrix { rows: data.len() };
    if has_constant_column(data.xs()) {
        return Err(singular);
    }

    let xs = ArrayView1::from(data.xs());
    let ys = ArrayView1::from(data.ys());
    let n = data.len() as f64;
    let (x_mean, y_mean) = (xs.sum() / n, ys.sum() / n);

    let dx = &xs - x_mean;
    let dy = &ys - y_mean;
    let sxx = dx.dot(&dx);
    let sxy = dx.dot(&dy);

    // Only reachable when the deviations underflow to zero.
    if sxx == 0. {
        return Err(singular);
    }

    let slope = sxy / sxx;
    Ok(Coefficients {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}

fn has_constant_column(xs: &[f64]) -> bool {
    xs.split_first()
        .is_none_or(|(first, rest)| rest.iter().all(|x| x == first))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn no_epsilon() {
        let xs = vec![0., 1., 2., 3.];
        let ys = xs.iter().map(|x| 1. + 2. * x).collect();
        let data = Dataset::new(xs, ys).unwrap();

        let beta = estimate_beta(&data).unwrap();
        assert_abs_diff_eq!(beta.intercept(), 1., epsilon = 1e-12);
        assert_abs_diff_eq!(beta.slope(), 2., epsilon = 1e-12);
    }

    #[test]
    fn exact_recovery_with_negative_x() {
        let data = Dataset::new(vec![-1., 0., 1., 2.], vec![-1., 1., 3., 5.]).unwrap();
        let [b0, b1] = estimate_beta(&data).unwrap().to_array();
        assert_abs_diff_eq!(b0, 1., epsilon = 1e-12);
        assert_abs_diff_eq!(b1, 2., epsilon = 1e-12);
    }

    #[test]
    fn two_points_define_the_line() {
        let data = Dataset::new(vec![1., 3.], vec![2., -2.]).unwrap();
        let beta = estimate_beta(&data).unwrap();
        assert_abs_diff_eq!(beta.slope(), -2., epsilon = 1e-12);
        assert_abs_diff_eq!(beta.intercept(), 4., epsilon = 1e-12);
    }

    #[test]
    fn least_squares_fit() {
        // x̄ = 1.5, ȳ = 2.5, Sxy = 6, Sxx = 5 => β₁ = 1.2, β₀ = 0.7
        let data = Dataset::new(vec![0., 1., 2., 3.], vec![1., 2., 2., 5.]).unwrap();
        let beta = estimate_beta(&data).unwrap();
        assert_abs_diff_eq!(beta.slope(), 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(beta.intercept(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn offset_x_is_not_singular() {
        let xs = vec![1e8, 1e8 + 1., 1e8 + 2.];
        let ys = xs.iter().map(|x| x - 1e8).collect();
        let beta = estimate_beta(&Dataset::new(xs, ys).unwrap()).unwrap();
        assert_abs_diff_eq!(beta.slope(), 1., epsilon = 1e-12);
        assert_abs_diff_eq!(beta.intercept(), -1e8, epsilon = 1e-6);
    }

    #[test]
    fn timestamp_like_x() {
        let xs = [0., 60., 120., 180.].iter().map(|t| 1.7e9 + t).collect();
        let data = Dataset::new(xs, vec![0., 1., 2., 3.]).unwrap();

        let beta = estimate_beta(&data).unwrap();
        assert_abs_diff_eq!(beta.slope(), 1. / 60., epsilon = 1e-12);
        assert_abs_diff_eq!(beta.intercept(), 1.5 - (1.7e9 + 90.) / 60., epsilon = 1e-5);
    }

    #[test]
    fn singular_constant_x() {
        let data = Dataset::new(vec![2., 2., 2.], vec![1., 5., 9.]).unwrap();
        assert_eq!(
            estimate_beta(&data),
            Err(EstimationErr::SingularMatrix { rows: 3 })
        );
    }

    #[test]
    fn singular_constant_fractional_x() {
        let data = Dataset::new(vec![0.1; 7], vec![1., 2., 3., 4., 5., 6., 7.]).unwrap();
        assert!(matches!(
            estimate_beta(&data),
            Err(EstimationErr::SingularMatrix { .. })
        ));
    }
}
