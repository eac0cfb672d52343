//! Listing the flights under the data root.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TablesError, TablesResult};
use crate::flight_tables::{BUILDUP_INFORMATION_FILE, PIECE_INFORMATION_FILE};
use crate::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightListing {
    /// `<route-folder>/<flight-folder>`, always with `/`.
    pub path: String,
    /// Rows in the piece table, else in the build-up table, else 0.
    pub item_count: usize,
}

/// Every `Flight*` folder two levels below `data_root`, smallest item
/// count first, then by path. A missing root lists nothing.
pub fn list_flights(data_root: &Path) -> TablesResult<Vec<FlightListing>> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| TablesError::Io { path, source }
    };
    let routes = match fs::read_dir(data_root) {
        Ok(routes) => routes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(data_root)(e)),
    };

    let mut listings = Vec::new();
    for route in routes {
        let route = route.map_err(io_err(data_root))?;
        let route_path = route.path();
        if !route_path.is_dir() {
            continue;
        }
        for flight in fs::read_dir(&route_path).map_err(io_err(&route_path))? {
            let flight = flight.map_err(io_err(&route_path))?;
            let flight_path = flight.path();
            let name = flight.file_name().to_string_lossy().into_owned();
            if !flight_path.is_dir() || !name.starts_with("Flight") {
                continue;
            }
            listings.push(FlightListing {
                path: format!("{}/{}", route.file_name().to_string_lossy(), name),
                item_count: item_count(&flight_path),
            });
        }
    }

    listings.sort_by(|a, b| (a.item_count, &a.path).cmp(&(b.item_count, &b.path)));
    tracing::debug!(root = %data_root.display(), flights = listings.len(), "listed flights");
    Ok(listings)
}

fn item_count(flight_dir: &Path) -> usize {
    for file in [PIECE_INFORMATION_FILE, BUILDUP_INFORMATION_FILE] {
        let path = flight_dir.join(file);
        if !path.exists() {
            continue;
        }
        return match Table::from_path(&path) {
            Ok(table) => table.len(),
            Err(e) => {
                tracing::debug!(error = %e, "counting as zero items");
                0
            }
        };
    }
    0
}
