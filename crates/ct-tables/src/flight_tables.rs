//! Loading every table of one flight directory.

use std::path::{Path, PathBuf};

use ct_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{TablesError, TablesResult};
use crate::records::{BuildupTable, FlightHeader, LoadLocationRow, PaxSummary, PieceRecord};
use crate::table::Table;

pub const FLIGHT_INFORMATION_FILE: &str = "FlightInformation.csv";
pub const PIECE_INFORMATION_FILE: &str = "PieceInformation.csv";
pub const BUILDUP_INFORMATION_FILE: &str = "BuildUpInformation.csv";
pub const LOAD_LOCATIONS_FILE: &str = "LoadLocations.csv";
pub const PAX_INFORMATION_FILE: &str = "PaxInformation.csv";

/// Paths of the five input files of a flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightFiles {
    pub dir: PathBuf,
    pub flight_information: PathBuf,
    pub piece_information: PathBuf,
    pub buildup_information: PathBuf,
    pub load_locations: PathBuf,
    pub pax_information: PathBuf,
}

impl FlightFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            flight_information: dir.join(FLIGHT_INFORMATION_FILE),
            piece_information: dir.join(PIECE_INFORMATION_FILE),
            buildup_information: dir.join(BUILDUP_INFORMATION_FILE),
            load_locations: dir.join(LOAD_LOCATIONS_FILE),
            pax_information: dir.join(PAX_INFORMATION_FILE),
        }
    }
}

/// All raw tables of one flight.
///
/// The header, piece and build-up tables are required. Load locations and
/// the passenger summary are optional; problems reading them are recorded
/// in `warnings` instead of failing the load.
#[derive(Debug, Clone)]
pub struct FlightTables {
    pub files: FlightFiles,
    pub header: FlightHeader,
    pub pieces: Vec<PieceRecord>,
    pub buildup: BuildupTable,
    pub load_locations: Option<Vec<LoadLocationRow>>,
    pub pax: Option<PaxSummary>,
    pub warnings: Vec<String>,
}

impl FlightTables {
    pub fn load(dir: &Path, standard_pax_mass_kg: Real) -> TablesResult<Self> {
        if !dir.is_dir() {
            return Err(TablesError::Missing {
                path: dir.to_path_buf(),
            });
        }
        let files = FlightFiles::in_dir(dir);
        let header = FlightHeader::from_table(&Table::from_path(&files.flight_information)?)?;
        let pieces = PieceRecord::read_all(&Table::from_path(&files.piece_information)?);
        let buildup = BuildupTable::from_table(&Table::from_path(&files.buildup_information)?);

        let mut warnings = Vec::new();
        let load_locations = optional(&files.load_locations, &mut warnings)
            .map(|table| LoadLocationRow::read_all(&table));
        let pax = optional(&files.pax_information, &mut warnings)
            .and_then(|table| PaxSummary::from_table(&table, standard_pax_mass_kg));

        tracing::debug!(
            dir = %dir.display(),
            pieces = pieces.len(),
            buildup_rows = buildup.rows.len(),
            has_load_locations = load_locations.is_some(),
            has_pax = pax.is_some(),
            "loaded flight tables"
        );
        Ok(Self {
            files,
            header,
            pieces,
            buildup,
            load_locations,
            pax,
            warnings,
        })
    }
}

fn optional(path: &Path, warnings: &mut Vec<String>) -> Option<Table> {
    match Table::from_path(path) {
        Ok(table) => Some(table),
        Err(TablesError::Missing { .. }) => {
            tracing::debug!(path = %path.display(), "optional table not present");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable optional table");
            warnings.push(format!("Ignoring unreadable table: {e}"));
            None
        }
    }
}
