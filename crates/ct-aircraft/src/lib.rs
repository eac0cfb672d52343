//! ct-aircraft: read-only reference data for weight-and-balance work.
//!
//! Provides:
//! - Aircraft geometry constants keyed by aircraft type code
//! - Fuel-efficiency bracket curves per aircraft family
//! - ULD type catalog (maximum gross weights)
//! - Compartment weight limits
//!
//! All tables are immutable once built. Load them once at startup and share
//! them behind an `Arc` (see [`ReferenceData`]).

pub mod brackets;
pub mod error;
pub mod geometry;
pub mod limits;
pub mod uld;

use std::path::Path;

pub use brackets::{AircraftFamily, BracketCatalog, FuelBracketSet};
pub use error::{AircraftError, AircraftResult};
pub use geometry::{AircraftGeometry, AircraftTable};
pub use limits::CompartmentLimits;
pub use uld::{UldTypeCatalog, uld_type_of};

/// Every reference table the calculators need, bundled for injection.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub aircraft: AircraftTable,
    pub brackets: BracketCatalog,
    pub uld_types: UldTypeCatalog,
}

impl ReferenceData {
    /// Built-in curves and ULD catalog plus the aircraft table read from `path`.
    pub fn load(aircraft_table: &Path) -> AircraftResult<Self> {
        Ok(Self {
            aircraft: AircraftTable::from_csv_path(aircraft_table)?,
            brackets: BracketCatalog::standard(),
            uld_types: UldTypeCatalog::standard(),
        })
    }

    /// Built-in tables only; no aircraft geometry is known.
    pub fn builtin() -> Self {
        Self {
            aircraft: AircraftTable::default(),
            brackets: BracketCatalog::standard(),
            uld_types: UldTypeCatalog::standard(),
        }
    }
}
