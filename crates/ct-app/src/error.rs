//! Error types for the ct-app service layer.

use std::path::PathBuf;

use crate::optimizer::OptimizerError;

/// Errors surfaced by the service layer. The resolution pipeline itself
/// turns these into failed results instead of returning them.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read settings file: {path}")]
    SettingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("Invalid flight path: {0}")]
    FlightPath(#[from] ct_core::CtError),

    #[error("Reference data error: {0}")]
    Reference(#[from] ct_aircraft::AircraftError),

    #[error("Input tables error: {0}")]
    Tables(#[from] ct_tables::TablesError),

    #[error("Report error: {0}")]
    Report(#[from] ct_report::ReportError),

    #[error("Results error: {0}")]
    Results(#[from] ct_results::ResultsError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ct-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Settings(format!("Failed to parse settings YAML: {}", err))
    }
}
