use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for reading store operations.
///
/// Every failure below the store boundary surfaces as one of these two
/// variants, so callers only ever see a write failure or a read failure.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Initialization, newline repair or row append failed
    #[error("Failed to write to CSV file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be read or contains a malformed row
    #[error("Failed to read CSV file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadFailure,
    },
}

/// Why a read of the reading file failed
#[derive(Error, Debug)]
pub enum ReadFailure {
    /// Underlying I/O error
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The file is not well-formed comma-separated text
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a required column
    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),

    /// A row has no value for a required column
    #[error("line {line}: missing value for {column}")]
    MissingField { line: u64, column: &'static str },

    /// A numeric column holds something that is not an integer
    #[error("line {line}: invalid {column} value {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    /// Date and time columns do not form a valid timestamp
    #[error("line {line}: invalid date/time {value:?}")]
    InvalidTimestamp { line: u64, value: String },
}

impl StorageError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: impl Into<ReadFailure>) -> Self {
        StorageError::Read {
            path: path.into(),
            source: source.into(),
        }
    }
}
