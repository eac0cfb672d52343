//! Pieces shared by the three tier normalizers.

use ct_aircraft::{ReferenceData, uld_type_of};
use ct_core::{FlightIdentity, Real, compartment_of, side_of};
use ct_results::{CargoItem, Container, FlightInfo};
use ct_tables::{BuildupTable, FlightTables, PieceRecord};

use crate::config::Settings;

/// Read-only inputs every tier works from.
#[derive(Clone, Copy)]
pub struct TierContext<'a> {
    pub identity: &'a FlightIdentity,
    pub tables: &'a FlightTables,
    pub reference: &'a ReferenceData,
    pub settings: &'a Settings,
}

impl TierContext<'_> {
    pub fn aircraft_type(&self) -> &str {
        self.tables.header.aircraft_type_or_empty()
    }

    pub fn flight_info(&self) -> FlightInfo {
        let header = &self.tables.header;
        let route = &self.identity.route;
        // Six-letter routes read as origin + destination (`AMSSIN`).
        let (from, to) = if route.len() == 6 && route.is_ascii() {
            (route[..3].to_string(), route[3..].to_string())
        } else {
            (String::new(), String::new())
        };
        FlightInfo {
            path: self.identity.path.clone(),
            flight_number: header
                .flight_number
                .clone()
                .unwrap_or_else(|| self.identity.flight.to_string()),
            route: route.clone(),
            departure_airport: header.departure_airport.clone().unwrap_or(from),
            arrival_airport: header.arrival_airport.clone().unwrap_or(to),
            date: header
                .flight_date
                .clone()
                .or_else(|| self.identity.date.clone())
                .unwrap_or_default(),
            aircraft_type: self.aircraft_type().to_string(),
            aircraft_registration: header.aircraft_registration.clone(),
        }
    }

    /// A container with type, limit, compartment and side derived from its
    /// serial and position.
    pub fn container(
        &self,
        index: usize,
        serial: &str,
        weight_kg: Real,
        position: Option<String>,
    ) -> Container {
        let uld_type = uld_type_of(serial);
        let max_weight_kg = Some(self.reference.uld_types.max_weight(&uld_type));
        Container {
            index,
            serial: serial.to_string(),
            uld_type,
            weight_kg,
            max_weight_kg,
            compartment: position.as_deref().and_then(compartment_of),
            side: position.as_deref().and_then(side_of),
            position,
        }
    }

    /// ZFW from the first recorded candidate, else cargo weight plus the
    /// operating empty weight.
    pub fn zfw(
        &self,
        recorded: &[Option<Real>],
        cargo_kg: Real,
        warnings: &mut Vec<String>,
    ) -> Real {
        if let Some(zfw) = recorded.iter().flatten().copied().find(|v| *v > 0.0) {
            return zfw;
        }
        let oew = self.settings.assumptions.operating_empty_weight_kg;
        warnings.push(format!(
            "No recorded zero-fuel weight; estimated as cargo weight plus {oew:.0} kg operating empty weight"
        ));
        cargo_kg + oew
    }
}

pub fn items_from_pieces(pieces: &[PieceRecord]) -> Vec<CargoItem> {
    pieces
        .iter()
        .enumerate()
        .map(|(index, p)| CargoItem {
            index,
            serial: p.serial.clone(),
            pieces: p.pieces,
            weight_kg: p.weight_kg,
            volume_m3: p.volume_m3,
            crt: p.crt,
            col: p.col,
            dangerous: p.dangerous,
            commodity: p.commodity.clone(),
            container: None,
        })
        .collect()
}

/// Assigns items to containers through build-up air-waybill numbers.
///
/// Each air-waybill maps to the ULD of its first build-up row. An item goes
/// to the first waybill that its serial contains, or that equals the last
/// `-` segment of its serial. Returns the number of items assigned.
pub fn assign_by_air_waybill(
    items: &mut [CargoItem],
    buildup: &BuildupTable,
    containers: &[Container],
) -> usize {
    let mut waybills: Vec<(&str, usize)> = Vec::new();
    for row in &buildup.rows {
        let (Some(awb), Some(uld)) = (row.air_waybill.as_deref(), row.uld.as_deref()) else {
            continue;
        };
        if awb.is_empty() || waybills.iter().any(|(a, _)| *a == awb) {
            continue;
        }
        if let Some(index) = containers.iter().position(|c| c.serial == uld) {
            waybills.push((awb, index));
        }
    }

    let mut assigned = 0;
    for item in items.iter_mut() {
        let last_segment = item.serial.rsplit('-').next().unwrap_or("");
        let hit = waybills
            .iter()
            .find(|(awb, _)| item.serial.contains(awb) || last_segment == *awb);
        if let Some((_, index)) = hit {
            item.container = Some(*index);
            assigned += 1;
        }
    }
    assigned
}
