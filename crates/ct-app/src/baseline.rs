//! The as-loaded baseline a result is compared against.
//!
//! Built from the flight header (recorded MAC ZFW and trip fuel) and the
//! cargo rows of the load-location table.

use std::collections::{BTreeMap, HashSet};

use ct_core::{Compartment, Side, compartment_of, side_of};
use ct_results::BaselineSummary;
use ct_tables::FlightTables;

use crate::config::Assumptions;

/// `None`, with a warning, when the header records no MAC ZFW.
pub fn as_loaded(
    tables: &FlightTables,
    assumptions: &Assumptions,
    warnings: &mut Vec<String>,
) -> Option<BaselineSummary> {
    let header = &tables.header;
    let Some(mac_zfw) = header.mac_zfw_percent() else {
        warnings.push("No recorded MAC ZFW; comparison with the as-loaded baseline skipped".to_string());
        return None;
    };
    let trip_fuel_kg = match header.trip_fuel_kg.filter(|v| *v > 0.0) {
        Some(v) => v,
        None => {
            let v = assumptions.default_trip_fuel_kg;
            warnings.push(format!("No recorded trip fuel; assuming {v:.0} kg"));
            v
        }
    };

    let mut summary = BaselineSummary {
        mac_zfw: Some(mac_zfw),
        weight_by_compartment: Compartment::ALL.into_iter().map(|c| (c, 0.0)).collect(),
        weight_by_side: Side::ALL.into_iter().map(|s| (s, 0.0)).collect(),
        weight_by_position: BTreeMap::new(),
        total_weight_kg: 0.0,
        container_count: 0,
        trip_fuel_kg,
    };

    let Some(rows) = &tables.load_locations else {
        return Some(summary);
    };
    let mut serials = HashSet::new();
    for row in rows.iter().filter(|r| r.is_cargo()) {
        let (Some(location), Some(kg)) = (row.location.as_deref(), row.weight_kg) else {
            continue;
        };
        if kg <= 0.0 {
            continue;
        }
        let Some(compartment) = compartment_of(location) else {
            continue;
        };
        *summary.weight_by_compartment.entry(compartment).or_insert(0.0) += kg;
        match side_of(location) {
            Some(side) => *summary.weight_by_side.entry(side).or_insert(0.0) += kg,
            None => {
                for side in Side::ALL {
                    *summary.weight_by_side.entry(side).or_insert(0.0) += kg / 2.0;
                }
            }
        }
        *summary
            .weight_by_position
            .entry(location.to_string())
            .or_insert(0.0) += kg;
        summary.total_weight_kg += kg;
        if let Some(serial) = row.serial.as_deref() {
            serials.insert(serial);
        }
    }
    summary.container_count = serials.len();
    Some(summary)
}
