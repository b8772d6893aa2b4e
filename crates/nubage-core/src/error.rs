use std::{io, path::PathBuf};

use thiserror::Error;

/// Input rejected before it reaches the ledger. The ledger is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("No valid value: `{0}`")]
    InvalidValue(String),
    #[error("Unknown period `{0}`")]
    UnknownPeriod(String),
    #[error("Unknown category `{0}`")]
    UnknownCategory(String),
}

/// An entry that cannot be projected. Aggregation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("Calculating error: entry {index} (`{title}`) has non-numeric value `{value}`")]
    InvalidValue {
        index: usize,
        title: String,
        value: String,
    },
    #[error("Calculating error: entry {index} (`{title}`) has unrecognized period `{period}`")]
    UnrecognizedPeriod {
        index: usize,
        title: String,
        period: String,
    },
    #[error("Calculating error: entry {index} (`{title}`) pushes the total out of range")]
    Overflow { index: usize, title: String },
}

/// Failure reported by a persistence backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Invalid file `{0}`: expected a .json document")]
    InvalidFormat(PathBuf),
    #[error("JSON file `{path}` corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("No file selected to save the ledger to")]
    NoSaveTarget,
}
