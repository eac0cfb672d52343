//! Aircraft geometry constants for the balance-index formula.
//!
//! One row per aircraft type code, read from the operator's reference table
//! (`Main.csv`). Column names follow that table: `ACType`, `C`, `K`,
//! `ReferenceArm`, `LEMAC`, `MACFormula`, `DOIIndex` (or `DOI`),
//! `DeltaIndexCargoC1..C4`, `DeltaIndexPax0A..0G`, `MaxWeightC1..C4`.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;

use ct_core::{Compartment, Real};
use serde::{Deserialize, Serialize};

use crate::error::{AircraftError, AircraftResult};

/// Passenger zones carrying their own delta-index coefficient.
pub const PAX_ZONES: [&str; 7] = ["0A", "0B", "0C", "0D", "0E", "0F", "0G"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftGeometry {
    pub ac_type: String,
    /// Index scaling constant.
    pub c: Real,
    /// Index offset constant.
    pub k: Real,
    pub reference_arm: Real,
    /// Leading edge of the mean aerodynamic chord.
    pub lemac: Real,
    /// MAC length used as the percentage divisor.
    pub mac_formula: Real,
    /// Dry operating index.
    pub doi: Real,
    /// Index change per kg of cargo, per compartment (C1..C4).
    pub cargo_delta_index: [Real; 4],
    /// Index change per kg of passengers, per zone (0A..0G).
    pub pax_delta_index: [Real; 7],
    /// Structural limit per compartment, when the table carries it.
    pub max_compartment_weight: Option<[Real; 4]>,
}

impl AircraftGeometry {
    pub fn cargo_delta(&self, compartment: Compartment) -> Real {
        self.cargo_delta_index[compartment.slot()]
    }

    pub fn max_weight(&self, compartment: Compartment) -> Option<Real> {
        self.max_compartment_weight
            .map(|limits| limits[compartment.slot()])
    }
}

/// Aircraft geometry rows keyed by type code.
#[derive(Debug, Clone, Default)]
pub struct AircraftTable {
    rows: BTreeMap<String, AircraftGeometry>,
}

impl AircraftTable {
    pub fn from_csv_path(path: &Path) -> AircraftResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|source| AircraftError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let table = Self::from_csv_reader(reader)?;
        tracing::debug!(
            path = %path.display(),
            types = table.len(),
            "loaded aircraft geometry table"
        );
        Ok(table)
    }

    /// Rows with an unparseable number are skipped, leaving that type
    /// without constants. A table without an `ACType` column is not an
    /// aircraft table and is rejected.
    pub fn from_csv_reader<R: io::Read>(mut reader: csv::Reader<R>) -> AircraftResult<Self> {
        let headers: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.to_string(), i))
            .collect();
        if !headers.contains_key("ACType") {
            return Err(AircraftError::MissingColumn { column: "ACType" });
        }

        let mut table = Self::default();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row = RowReader {
                headers: &headers,
                record: &record,
                row: i + 1,
            };
            let Some(ac_type) = row.text("ACType") else {
                continue;
            };

            let geometry = match row.geometry(ac_type) {
                Ok(geometry) => geometry,
                Err(e) => {
                    tracing::warn!(
                        row = i + 1,
                        ac_type,
                        error = %e,
                        "skipping malformed aircraft row"
                    );
                    continue;
                }
            };
            // First row wins for a repeated type code.
            table.rows.entry(geometry.ac_type.clone()).or_insert(geometry);
        }
        Ok(table)
    }

    pub fn insert(&mut self, geometry: AircraftGeometry) {
        self.rows.insert(geometry.ac_type.clone(), geometry);
    }

    pub fn get(&self, ac_type: &str) -> Option<&AircraftGeometry> {
        self.rows.get(ac_type.trim())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

struct RowReader<'a> {
    headers: &'a HashMap<String, usize>,
    record: &'a csv::StringRecord,
    row: usize,
}

impl RowReader<'_> {
    fn text(&self, column: &str) -> Option<&str> {
        let idx = *self.headers.get(column)?;
        self.record.get(idx).filter(|v| !v.is_empty())
    }

    /// Geometry for one row; any unparseable number rejects the row.
    fn geometry(&self, ac_type: &str) -> AircraftResult<AircraftGeometry> {
        let doi = match self.number("DOIIndex")? {
            Some(v) => v,
            None => self.number("DOI")?.unwrap_or(0.0),
        };

        let mut cargo_delta_index = [0.0; 4];
        for (slot, column) in [
            "DeltaIndexCargoC1",
            "DeltaIndexCargoC2",
            "DeltaIndexCargoC3",
            "DeltaIndexCargoC4",
        ]
        .into_iter()
        .enumerate()
        {
            cargo_delta_index[slot] = self.number(column)?.unwrap_or(0.0);
        }

        let mut pax_delta_index = [0.0; 7];
        for (slot, column) in [
            "DeltaIndexPax0A",
            "DeltaIndexPax0B",
            "DeltaIndexPax0C",
            "DeltaIndexPax0D",
            "DeltaIndexPax0E",
            "DeltaIndexPax0F",
            "DeltaIndexPax0G",
        ]
        .into_iter()
        .enumerate()
        {
            pax_delta_index[slot] = self.number(column)?.unwrap_or(0.0);
        }

        let max_compartment_weight = match (
            self.number("MaxWeightC1")?,
            self.number("MaxWeightC2")?,
            self.number("MaxWeightC3")?,
            self.number("MaxWeightC4")?,
        ) {
            (Some(c1), Some(c2), Some(c3), Some(c4)) => Some([c1, c2, c3, c4]),
            _ => None,
        };

        Ok(AircraftGeometry {
            ac_type: ac_type.to_string(),
            c: self.number("C")?.unwrap_or(0.0),
            k: self.number("K")?.unwrap_or(0.0),
            reference_arm: self.number("ReferenceArm")?.unwrap_or(0.0),
            lemac: self.number("LEMAC")?.unwrap_or(0.0),
            mac_formula: self.number("MACFormula")?.unwrap_or(100.0),
            doi,
            cargo_delta_index,
            pax_delta_index,
            max_compartment_weight,
        })
    }

    fn number(&self, column: &'static str) -> AircraftResult<Option<Real>> {
        match self.text(column) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<Real>()
                .map(Some)
                .map_err(|_| AircraftError::InvalidValue {
                    column,
                    row: self.row,
                    value: raw.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
ACType,C,K,ReferenceArm,LEMAC,MACFormula,DOIIndex,DeltaIndexCargoC1,DeltaIndexCargoC2,DeltaIndexCargoC3,DeltaIndexCargoC4,MaxWeightC1,MaxWeightC2,MaxWeightC3,MaxWeightC4
789,200000,50,30.0,28.0,7.0,60,-0.01,-0.005,0.004,0.008,18000,18000,14000,14000
772,250000,40,29.0,27.5,7.2,55,-0.012,-0.006,0.005,0.009,,,,
789,1,1,1,1,1,1,0,0,0,0,,,,
";

    fn table() -> AircraftTable {
        AircraftTable::from_csv_reader(csv::Reader::from_reader(TABLE.as_bytes())).unwrap()
    }

    #[test]
    fn reads_rows_by_type() {
        let table = table();
        assert_eq!(table.len(), 2);
        let g = table.get("789").unwrap();
        assert_eq!(g.c, 200000.0);
        assert_eq!(g.doi, 60.0);
        assert_eq!(g.cargo_delta(Compartment::C4), 0.008);
        assert_eq!(g.max_weight(Compartment::C3), Some(14000.0));
        assert_eq!(g.pax_delta_index, [0.0; 7]);
    }

    #[test]
    fn first_row_wins_for_duplicates() {
        assert_eq!(table().get("789").unwrap().lemac, 28.0);
    }

    #[test]
    fn partial_limits_are_treated_as_absent() {
        assert_eq!(table().get("772").unwrap().max_compartment_weight, None);
    }

    #[test]
    fn missing_type_column_is_an_error() {
        let err =
            AircraftTable::from_csv_reader(csv::Reader::from_reader("C,K\n1,2\n".as_bytes()))
                .unwrap_err();
        assert!(matches!(err, AircraftError::MissingColumn { .. }));
    }

    #[test]
    fn garbage_number_skips_only_its_row() {
        let table = AircraftTable::from_csv_reader(csv::Reader::from_reader(
            "ACType,LEMAC\n789,abc\n781,12.5\n".as_bytes(),
        ))
        .unwrap();
        assert!(table.get("789").is_none());
        assert_eq!(table.get("781").unwrap().lemac, 12.5);
    }

    #[test]
    fn invalid_value_names_row_and_column() {
        let headers: HashMap<String, usize> =
            [("ACType".to_string(), 0), ("C".to_string(), 1)].into();
        let record = csv::StringRecord::from(vec!["789", "abc"]);
        let row = RowReader {
            headers: &headers,
            record: &record,
            row: 2,
        };
        let err = row.geometry("789").unwrap_err();
        assert!(matches!(
            err,
            AircraftError::InvalidValue { column: "C", row: 2, .. }
        ));
    }

    #[test]
    fn doi_column_alias() {
        let table = AircraftTable::from_csv_reader(csv::Reader::from_reader(
            "ACType,DOI\n781,42.5\n".as_bytes(),
        ))
        .unwrap();
        assert_eq!(table.get("781").unwrap().doi, 42.5);
        assert_eq!(table.get("781").unwrap().mac_formula, 100.0);
    }
}
