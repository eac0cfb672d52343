//! ct-report: precomputed solver reports.
//!
//! - [`parser`]: structured facts from the free-text `Results.txt`
//! - [`general_info`]: the `General_Information.txt` sidecar
//! - [`variant`]: model variants and their report roots
//! - [`locator`]: two-stage index from flight identity to report directory

pub mod error;
pub mod general_info;
pub mod locator;
pub mod parser;
pub mod variant;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use error::{ReportError, ReportResult};
pub use general_info::{GeneralInfo, parse_general_info};
pub use locator::{ReportEntry, ReportIndex, ReportLocator};
pub use parser::{ParsedReport, Placement, parse_report};
pub use variant::ModelVariant;

pub const REPORT_FILE: &str = "Results.txt";
pub const GENERAL_INFO_FILE: &str = "General_Information.txt";

/// Everything read from one report directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputedReport {
    pub dir: PathBuf,
    pub parsed: ParsedReport,
    pub general: Option<GeneralInfo>,
}

impl PrecomputedReport {
    /// Reads and parses `Results.txt` and, when present, the sidecar.
    ///
    /// A missing or unreadable report file is an error; an unreadable sidecar
    /// is logged and treated as absent.
    pub fn read(dir: &Path) -> ReportResult<Self> {
        let report_path = dir.join(REPORT_FILE);
        let text = fs::read_to_string(&report_path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ReportError::MissingReportFile {
                    path: report_path.clone(),
                }
            } else {
                ReportError::Io {
                    path: report_path.clone(),
                    source,
                }
            }
        })?;
        let parsed = parse_report(&text);

        let info_path = dir.join(GENERAL_INFO_FILE);
        let general = match fs::read_to_string(&info_path) {
            Ok(text) => Some(parse_general_info(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %info_path.display(), error = %e, "unreadable general information file");
                None
            }
        };

        tracing::debug!(
            dir = %dir.display(),
            containers = parsed.containers.len(),
            has_general_info = general.is_some(),
            "read precomputed report"
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            parsed,
            general,
        })
    }
}
