//! CLI-level errors (wraps core errors)

use std::io::ErrorKind;

use thiserror::Error;

use crate::errors::EdiError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Edi(#[from] EdiError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Edi(e) => match e {
                EdiError::Io(io) if io.kind() == ErrorKind::NotFound => exitcode::NOINPUT,
                EdiError::Io(_) => exitcode::IOERR,
                EdiError::Parse { .. } => exitcode::DATAERR,
                EdiError::Selection { .. } => exitcode::USAGE,
                EdiError::Delimiter { .. } | EdiError::Schema { .. } => exitcode::CONFIG,
            },
        }
    }
}
