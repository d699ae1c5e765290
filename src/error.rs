use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use bootstrap_core::{EstimationErr, ValidationErr};

/// The command line's result type.
pub type Result<T> = std::result::Result<T, CliErr>;

/// The exit status of a run rejected by input validation.
pub const EXIT_VALIDATION: u8 = 2;

/// The exit status of any other failed run.
pub const EXIT_FAILURE: u8 = 1;

/// Failures of a command line run.
#[derive(Debug)]
pub enum CliErr {
    Estimation(EstimationErr),
    Io { path: PathBuf, source: io::Error },
    Csv { path: PathBuf, source: csv::Error },
    Json(serde_json::Error),
}

impl CliErr {
    /// Returns the process exit status for this error.
    ///
    /// Rejected inputs share clap's status for a missing flag, every other
    /// failure exits with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliErr::Estimation(e) if e.is_validation() => EXIT_VALIDATION,
            _ => EXIT_FAILURE,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

impl Display for CliErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliErr::Estimation(e) => write!(f, "{e}"),
            CliErr::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            CliErr::Csv { path, source } => {
                write!(f, "invalid csv at {}: {source}", path.display())
            }
            CliErr::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl Error for CliErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliErr::Estimation(e) => Some(e),
            CliErr::Io { source, .. } => Some(source),
            CliErr::Csv { source, .. } => Some(source),
            CliErr::Json(e) => Some(e),
        }
    }
}

impl From<EstimationErr> for CliErr {
    fn from(value: EstimationErr) -> Self {
        Self::Estimation(value)
    }
}

impl From<ValidationErr> for CliErr {
    fn from(value: ValidationErr) -> Self {
        Self::Estimation(value.into())
    }
}

impl From<serde_json::Error> for CliErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
