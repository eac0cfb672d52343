//! Reference data errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for reference data loading.
pub type AircraftResult<T> = Result<T, AircraftError>;

#[derive(Error, Debug)]
pub enum AircraftError {
    #[error("Failed to read aircraft table {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Aircraft table is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Invalid value '{value}' in column '{column}' (row {row})")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("Bracket curve for {what} is not ordered by MAC")]
    UnorderedBrackets { what: String },
}
