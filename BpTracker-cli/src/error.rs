use std::io;
use std::path::PathBuf;

use thiserror::Error;

use bp_tracker_data::{ConfigError, StorageError};
use bp_tracker_domain::ValidationError;

/// Errors surfaced to the user, each with its distinguishing prefix
#[derive(Debug, Error)]
pub enum CliError {
    /// Input values out of range
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),

    /// Reading file could not be read or written
    #[error("Storage Error: {0}")]
    Storage(#[from] StorageError),

    /// Reading file location is not writable
    #[error("Storage Error: CSV file is not writable: {}", .0.display())]
    NotWritable(PathBuf),

    /// Settings file problem
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Interactive input was not a number
    #[error("Error: Invalid input - please enter numbers only")]
    InvalidNumber,

    /// Only some of systolic, diastolic and bpm were given
    #[error("error: All three values required: systolic diastolic bpm")]
    IncompleteReading,

    /// Input ended before all values were entered
    #[error("Cancelled by user.")]
    Cancelled,

    /// Writing to the terminal or reading stdin failed
    #[error("Unexpected Error: {0}")]
    Io(#[from] io::Error),

    /// Chart data could not be serialized
    #[error("Unexpected Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Cancelled => 130,
            CliError::IncompleteReading => 2,
            _ => 1,
        }
    }
}
