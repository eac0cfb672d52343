//! Raw table errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type TablesResult<T> = Result<T, TablesError>;

#[derive(Error, Debug)]
pub enum TablesError {
    #[error("Required input table not found: {path}")]
    Missing { path: PathBuf },

    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Table {path} has no data rows")]
    Empty { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TablesError::Missing {
            path: PathBuf::from("Data/x/PieceInformation.csv"),
        };
        assert!(err.to_string().contains("PieceInformation.csv"));
    }
}
