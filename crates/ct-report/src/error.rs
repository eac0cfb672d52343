//! Report loading errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Report file not found: {path}")]
    MissingReportFile { path: PathBuf },

    #[error("Unknown model variant '{name}'")]
    UnknownVariant { name: String },
}
