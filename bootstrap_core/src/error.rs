use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the estimation core.
pub type Result<T> = std::result::Result<T, EstimationErr>;

/// An input rejected before any numeric work begins.
///
/// Every variant names the offending argument so the message can be surfaced
/// to the user untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErr {
    /// An integer argument is below its inclusive lower bound.
    BelowMinimum {
        name: &'static str,
        got: i64,
        min: i64,
    },
    /// A real argument is NaN or infinite.
    NotFinite { name: &'static str, got: f64 },
    /// A real argument must be strictly positive.
    NotPositive { name: &'static str, got: f64 },
    /// The two columns of a dataset have different lengths.
    LengthMismatch { x_len: usize, y_len: usize },
    /// A tabular input doesn't have exactly the `x` and `y` columns.
    ColumnCount { got: usize },
    /// A tabular input's header doesn't name the `x` and `y` columns.
    ColumnNames { got: Vec<String> },
    /// A dataset has fewer rows than required.
    TooFewRows { got: usize, min: usize },
    /// A dataset cell is NaN or infinite.
    NonFiniteValue { row: usize, column: &'static str },
    /// A numeric sequence is too short for the requested statistic.
    TooFewValues { got: usize, min: usize },
}

impl Display for ValidationErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationErr::BelowMinimum { name, got, min } => {
                write!(f, "{name} must be >= {min}, got {got}")
            }
            ValidationErr::NotFinite { name, got } => write!(f, "{name} must be finite, got {got}"),
            ValidationErr::NotPositive { name, got } => write!(f, "{name} must be > 0, got {got}"),
            ValidationErr::LengthMismatch { x_len, y_len } => write!(
                f,
                "data columns must have the same length, got x={x_len} and y={y_len}"
            ),
            ValidationErr::ColumnCount { got } => {
                write!(f, "data must have exactly 2 columns (x, y), got {got}")
            }
            ValidationErr::ColumnNames { got } => {
                write!(f, "data columns must be named x and y, got {}", got.join(","))
            }
            ValidationErr::TooFewRows { got, min } => {
                write!(f, "data must have at least {min} rows, got {got}")
            }
            ValidationErr::NonFiniteValue { row, column } => {
                write!(f, "data contains a NaN or infinite value at row {row}, column {column}")
            }
            ValidationErr::TooFewValues { got, min } => {
                write!(f, "values must have at least {min} elements, got {got}")
            }
        }
    }
}

impl Error for ValidationErr {}

/// The estimation core's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationErr {
    /// An argument or dataset failed validation.
    Validation(ValidationErr),
    /// `XᵗX` can't be inverted because the predictor column has zero variance.
    SingularMatrix { rows: usize },
}

impl EstimationErr {
    /// Whether this error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, EstimationErr::Validation(_))
    }
}

impl Display for EstimationErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimationErr::Validation(e) => write!(f, "validation error: {e}"),
            EstimationErr::SingularMatrix { rows } => write!(
                f,
                "singular design matrix: x has zero variance across {rows} rows"
            ),
        }
    }
}

impl Error for EstimationErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EstimationErr::Validation(e) => Some(e),
            EstimationErr::SingularMatrix { .. } => None,
        }
    }
}

impl From<ValidationErr> for EstimationErr {
    fn from(value: ValidationErr) -> Self {
        Self::Validation(value)
    }
}
