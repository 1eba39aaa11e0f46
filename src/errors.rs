use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdiError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid EDI input at segment {index}: {reason}")]
    Parse { index: usize, reason: String },

    #[error("delimiter role '{role}' unavailable: {reason}")]
    Delimiter { role: &'static str, reason: String },

    #[error("invalid selection expression '{expr}': {reason}")]
    Selection { expr: String, reason: String },

    #[error("failed to load schema {path}: {reason}")]
    Schema { path: PathBuf, reason: String },
}

pub type EdiResult<T> = Result<T, EdiError>;
