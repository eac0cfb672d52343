//! ct-results: the canonical resolved-result schema and its archive.

pub mod hash;
pub mod metrics;
pub mod store;
pub mod types;

pub use hash::compute_result_id;
pub use metrics::*;
pub use store::{ArchiveManifest, ResultArchive};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archived result not found: {result_id}")]
    NotFound { result_id: String },

    #[error("Invalid result id: {0}")]
    InvalidId(String),
}
