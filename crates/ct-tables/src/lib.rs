//! ct-tables: the raw per-flight input tables.
//!
//! Each flight directory holds five CSV files:
//!
//! | file | contents |
//! |---|---|
//! | `FlightInformation.csv` | one header row: flight, aircraft, weights |
//! | `PieceInformation.csv` | one row per cargo piece / booking line |
//! | `BuildUpInformation.csv` | piece-to-ULD build-up assignments |
//! | `LoadLocations.csv` | as-loaded positions per deadload item |
//! | `PaxInformation.csv` | passenger summary |
//!
//! Column names are not rigid. Every logical column is resolved through a
//! list of known aliases ([`aliases`]); when none is present the reader
//! falls back to a safe default instead of failing.

pub mod aliases;
pub mod catalog;
pub mod error;
pub mod flight_tables;
pub mod records;
pub mod table;

pub use catalog::{FlightListing, list_flights};
pub use error::{TablesError, TablesResult};
pub use flight_tables::{FlightFiles, FlightTables};
pub use records::{
    BuildupRow, BuildupTable, FlightHeader, LoadLocationRow, PaxSummary, PieceRecord,
};
pub use table::{Column, Row, Table};
