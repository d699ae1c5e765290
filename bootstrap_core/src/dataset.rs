use ndarray::{Array2, ArrayView2};

use crate::{
    error::Result,
    validation::{self, MIN_ROWS},
};

/// A single paired observation `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

/// An immutable table of paired observations stored as two parallel columns.
///
/// The only way to build one is through a validating constructor, so every
/// `Dataset` in the program has equal length columns, at least the requested
/// amount of rows and only finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Dataset {
    /// Creates a new `Dataset` requiring at least two rows.
    ///
    /// # Arguments
    /// * `xs` - The predictor column.
    /// * `ys` - The response column.
    ///
    /// # Returns
    /// The dataset or a `ValidationErr` if the columns are invalid.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        Self::with_min_rows(xs, ys, MIN_ROWS)
    }

    /// Creates a new `Dataset` requiring at least `min_rows` rows.
    ///
    /// # Arguments
    /// * `xs` - The predictor column.
    /// * `ys` - The response column.
    /// * `min_rows` - The inclusive lower bound on rows.
    ///
    /// # Returns
    /// The dataset or a `ValidationErr` if the columns are invalid.
    pub fn with_min_rows(xs: Vec<f64>, ys: Vec<f64>, min_rows: usize) -> Result<Self> {
        validation::validate_columns(&xs, &ys, min_rows)?;
        Ok(Self { xs, ys })
    }

    /// Creates a new `Dataset` from a sequence of observations.
    pub fn from_observations<I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let (xs, ys) = observations.into_iter().map(|o| (o.x, o.y)).unzip();
        Self::new(xs, ys)
    }

    /// Creates a new `Dataset` from an `N x 2` array whose columns are `x` and `y`.
    ///
    /// # Arguments
    /// * `table` - A two dimensional view, one observation per row.
    ///
    /// # Returns
    /// The dataset or a `ValidationErr` if the shape or the values are invalid.
    pub fn from_array(table: ArrayView2<f64>) -> Result<Self> {
        validation::validate_shape(table.dim(), MIN_ROWS)?;

        let xs = table.column(0).to_vec();
        let ys = table.column(1).to_vec();
        Self::new(xs, ys)
    }

    /// Returns the dataset as an owned `N x 2` array.
    pub fn to_array(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.len(), 2), |(row, col)| match col {
            0 => self.xs[row],
            _ => self.ys[row],
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[inline]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[inline]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Returns the observation at `row`, or `None` if out of bounds.
    pub fn get(&self, row: usize) -> Option<Observation> {
        Some(Observation {
            x: *self.xs.get(row)?,
            y: *self.ys.get(row)?,
        })
    }

    /// Iterates the observations in row order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Observation> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| Observation { x, y })
    }

    /// Gathers the rows at `indices` into a new dataset.
    ///
    /// The indices come from a resample plan built for this dataset, so they
    /// are always in bounds and the result keeps every invariant.
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub(crate) fn gather(&self, indices: &[usize]) -> Self {
        Self {
            xs: indices.iter().map(|&i| self.xs[i]).collect(),
            ys: indices.iter().map(|&i| self.ys[i]).collect(),
        }
    }
}
