//! Argument and data checks run at the boundary of every public operation.
//!
//! All checks are fail-fast and side effect free: they return the validated
//! value or the first violation found.

use crate::error::ValidationErr;

/// The minimum amount of observations needed to fit a line.
pub const MIN_ROWS: usize = 2;

/// The minimum amount of resamples for a raw bootstrap ensemble.
pub const MIN_RESAMPLES: usize = 1;

/// The minimum amount of resamples for a bootstrap standard error.
///
/// A single draw has an undefined sample variance.
pub const MIN_SE_RESAMPLES: usize = 2;

type Checked<T> = std::result::Result<T, ValidationErr>;

/// Validates a raw integer count against an inclusive lower bound.
///
/// # Arguments
/// * `name` - The argument's name, used in the error message.
/// * `value` - The raw value, possibly negative.
/// * `min` - The inclusive lower bound.
///
/// # Returns
/// The value as a `usize` or `ValidationErr::BelowMinimum`.
pub fn validate_count(name: &'static str, value: i64, min: usize) -> Checked<usize> {
    let min_i = i64::try_from(min).unwrap_or(i64::MAX);
    if value < min_i {
        return Err(ValidationErr::BelowMinimum {
            name,
            got: value,
            min: min_i,
        });
    }

    usize::try_from(value).map_err(|_| ValidationErr::BelowMinimum {
        name,
        got: value,
        min: min_i,
    })
}

/// Validates an already unsigned count against an inclusive lower bound.
///
/// # Arguments
/// * `name` - The argument's name, used in the error message.
/// * `value` - The count.
/// * `min` - The inclusive lower bound.
pub fn check_count(name: &'static str, value: usize, min: usize) -> Checked<usize> {
    if value < min {
        return Err(ValidationErr::BelowMinimum {
            name,
            got: i64::try_from(value).unwrap_or(i64::MAX),
            min: i64::try_from(min).unwrap_or(i64::MAX),
        });
    }

    Ok(value)
}

/// Validates that a real argument is finite.
pub fn validate_finite(name: &'static str, value: f64) -> Checked<f64> {
    if !value.is_finite() {
        return Err(ValidationErr::NotFinite { name, got: value });
    }

    Ok(value)
}

/// Validates that a real argument is finite and strictly positive.
///
/// # Arguments
/// * `name` - The argument's name, used in the error message.
/// * `value` - The value to check.
///
/// # Returns
/// The value or the first violated constraint.
pub fn validate_positive(name: &'static str, value: f64) -> Checked<f64> {
    let value = validate_finite(name, value)?;
    if value <= 0. {
        return Err(ValidationErr::NotPositive { name, got: value });
    }

    Ok(value)
}

/// Validates a raw seed, which must be non-negative.
pub fn validate_seed(value: i64) -> Checked<u64> {
    u64::try_from(value).map_err(|_| ValidationErr::BelowMinimum {
        name: "seed",
        got: value,
        min: 0,
    })
}

/// Validates an optional raw seed, absence is always valid.
pub fn validate_optional_seed(value: Option<i64>) -> Checked<Option<u64>> {
    value.map(validate_seed).transpose()
}

/// Validates the shape of a tabular input given as `(rows, columns)`.
///
/// # Arguments
/// * `shape` - The rows and columns of the table.
/// * `min_rows` - The inclusive lower bound on rows.
pub fn validate_shape((rows, cols): (usize, usize), min_rows: usize) -> Checked<()> {
    if cols != 2 {
        return Err(ValidationErr::ColumnCount { got: cols });
    }

    if rows < min_rows {
        return Err(ValidationErr::TooFewRows {
            got: rows,
            min: min_rows,
        });
    }

    Ok(())
}

/// Validates a pair of data columns.
///
/// Checks are ordered from cheap to expensive: lengths, row count and then
/// finiteness of every cell.
///
/// # Arguments
/// * `xs` - The predictor column.
/// * `ys` - The response column.
/// * `min_rows` - The inclusive lower bound on rows.
///
/// # Returns
/// The first violation found, if any.
pub fn validate_columns(xs: &[f64], ys: &[f64], min_rows: usize) -> Checked<()> {
    if xs.len() != ys.len() {
        return Err(ValidationErr::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        });
    }

    validate_shape((xs.len(), 2), min_rows)?;

    for (row, (x, y)) in xs.iter().zip(ys).enumerate() {
        if !x.is_finite() {
            return Err(ValidationErr::NonFiniteValue { row, column: "x" });
        }
        if !y.is_finite() {
            return Err(ValidationErr::NonFiniteValue { row, column: "y" });
        }
    }

    Ok(())
}
