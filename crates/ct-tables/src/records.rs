//! Typed views over the raw tables.

use ct_core::Real;
use serde::{Deserialize, Serialize};

use crate::aliases;
use crate::error::{TablesError, TablesResult};
use crate::table::Table;

/// First row of `FlightInformation.csv`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightHeader {
    pub flight_number: Option<String>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub flight_date: Option<String>,
    pub aircraft_type: Option<String>,
    pub aircraft_registration: Option<String>,
    pub zero_fuel_weight_kg: Option<Real>,
    /// MAC ZFW as recorded, before unit normalisation.
    pub recorded_mac_zfw: Option<Real>,
    pub trip_fuel_kg: Option<Real>,
}

impl FlightHeader {
    pub fn from_table(table: &Table) -> TablesResult<Self> {
        let row = table.row(0).ok_or_else(|| TablesError::Empty {
            path: table.path().to_path_buf(),
        })?;
        let text = |names: &[&str]| row.text(table.resolve(names)).map(str::to_string);
        let number = |names: &[&str]| row.number(table.resolve(names));
        Ok(Self {
            flight_number: text(aliases::FLIGHT_NUMBER),
            departure_airport: text(aliases::DEPARTURE_AIRPORT),
            arrival_airport: text(aliases::ARRIVAL_AIRPORT),
            flight_date: text(aliases::FLIGHT_DATE),
            aircraft_type: text(aliases::AIRCRAFT_TYPE),
            aircraft_registration: text(aliases::AIRCRAFT_REGISTRATION),
            zero_fuel_weight_kg: number(aliases::ZERO_FUEL_WEIGHT).filter(|v| *v > 0.0),
            recorded_mac_zfw: number(aliases::MAC_ZFW),
            trip_fuel_kg: number(aliases::TRIP_FUEL),
        })
    }

    /// Recorded MAC ZFW as a percentage.
    ///
    /// Source systems store it as a percentage, a per-mille-like tenth
    /// (1 < v < 10) or a fraction (v < 1); the latter two are rescaled.
    pub fn mac_zfw_percent(&self) -> Option<Real> {
        self.recorded_mac_zfw.map(normalise_mac)
    }

    pub fn aircraft_type_or_empty(&self) -> &str {
        self.aircraft_type.as_deref().unwrap_or("")
    }
}

pub fn normalise_mac(raw: Real) -> Real {
    let mut v = raw;
    if 1.0 < v && v < 10.0 {
        v *= 10.0;
    }
    if v < 1.0 {
        v *= 100.0;
    }
    v
}

/// One row of `PieceInformation.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub serial: String,
    pub pieces: u32,
    pub weight_kg: Real,
    pub volume_m3: Option<Real>,
    pub crt: bool,
    pub col: bool,
    pub dangerous: bool,
    pub commodity: Option<String>,
}

impl PieceRecord {
    pub fn read_all(table: &Table) -> Vec<Self> {
        let serial = table.resolve(aliases::PIECE_SERIAL);
        let pieces = table.resolve(aliases::PIECE_COUNT);
        let weight = table.resolve(aliases::PIECE_WEIGHT);
        let volume = table.resolve(aliases::PIECE_VOLUME);
        let crt = table.resolve(aliases::PIECE_CRT);
        let col = table.resolve(aliases::PIECE_COL);
        let dangerous = table.resolve(aliases::PIECE_DANGEROUS);
        let commodity = table.resolve(aliases::PIECE_COMMODITY);

        table
            .rows()
            .enumerate()
            .map(|(i, row)| PieceRecord {
                serial: row
                    .text(serial)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("ITEM-{i}")),
                pieces: row
                    .number(pieces)
                    .filter(|n| *n >= 0.0)
                    .map(|n| n as u32)
                    .unwrap_or(1),
                weight_kg: row.number(weight).unwrap_or(0.0),
                volume_m3: row.number(volume),
                crt: row.flag(crt),
                col: row.flag(col),
                dangerous: row.flag(dangerous),
                commodity: row.text(commodity).map(str::to_string),
            })
            .collect()
    }
}

/// One row of `BuildUpInformation.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildupRow {
    pub uld: Option<String>,
    pub air_waybill: Option<String>,
    pub weight_kg: Option<Real>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildupTable {
    pub rows: Vec<BuildupRow>,
    /// Whether a ULD column was found at all.
    pub has_uld_column: bool,
    /// Whether a weight column was found at all.
    pub has_weight_column: bool,
}

impl BuildupTable {
    pub fn from_table(table: &Table) -> Self {
        let uld = table.resolve(aliases::BUILDUP_ULD);
        let awb = table.resolve(aliases::BUILDUP_AWB);
        let weight = table.resolve(aliases::BUILDUP_WEIGHT);
        let rows = table
            .rows()
            .map(|row| BuildupRow {
                uld: row.text(uld).map(str::to_string),
                air_waybill: row.text(awb).map(str::to_string),
                weight_kg: row.number(weight),
            })
            .collect();
        Self {
            rows,
            has_uld_column: uld.is_some(),
            has_weight_column: weight.is_some(),
        }
    }

    /// Distinct ULD serials in first-appearance order.
    pub fn uld_serials(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.uld.as_deref())
            .filter(|s| seen.insert(*s))
            .collect()
    }

    pub fn rows_for<'a>(&'a self, uld: &'a str) -> impl Iterator<Item = &'a BuildupRow> + 'a {
        self.rows
            .iter()
            .filter(move |r| r.uld.as_deref() == Some(uld))
    }
}

/// One row of `LoadLocations.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadLocationRow {
    pub serial: Option<String>,
    pub location: Option<String>,
    pub deadload_type: Option<String>,
    pub weight_kg: Option<Real>,
}

impl LoadLocationRow {
    pub fn read_all(table: &Table) -> Vec<Self> {
        let serial = table.resolve(aliases::LOCATION_SERIAL);
        let location = table.resolve(aliases::LOCATION_POSITION);
        let deadload = table.resolve(aliases::LOCATION_DEADLOAD_TYPE);
        let weight = table.resolve(aliases::LOCATION_WEIGHT);
        table
            .rows()
            .map(|row| LoadLocationRow {
                serial: row.text(serial).map(str::to_string),
                location: row.text(location).map(str::to_string),
                deadload_type: row.text(deadload).map(str::to_string),
                weight_kg: row.number(weight),
            })
            .collect()
    }

    /// Cargo deadload. Rows without a type column count as cargo.
    pub fn is_cargo(&self) -> bool {
        self.deadload_type.as_deref().is_none_or(|t| t == "C")
    }
}

/// Passenger weight derived from `PaxInformation.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaxSummary {
    pub total_weight_kg: Real,
}

impl PaxSummary {
    /// Summed weight column, or summed head count times `standard_mass_kg`.
    /// `None` when the table has neither.
    pub fn from_table(table: &Table, standard_mass_kg: Real) -> Option<Self> {
        if let Some(weight) = table.resolve(aliases::PAX_WEIGHT) {
            let total: Real = table.rows().filter_map(|r| r.number(Some(weight))).sum();
            return Some(Self {
                total_weight_kg: total,
            });
        }
        let count = table.resolve(aliases::PAX_COUNT)?;
        let heads: Real = table.rows().filter_map(|r| r.number(Some(count))).sum();
        Some(Self {
            total_weight_kg: heads * standard_mass_kg,
        })
    }
}
