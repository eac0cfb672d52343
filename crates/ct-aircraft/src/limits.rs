//! Compartment structural limits and the centre-of-gravity window.

use ct_core::{Compartment, Real};
use serde::{Deserialize, Serialize};

use crate::geometry::AircraftGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompartmentLimits {
    pub c1_kg: Real,
    pub c2_kg: Real,
    pub c3_kg: Real,
    pub c4_kg: Real,
}

impl Default for CompartmentLimits {
    fn default() -> Self {
        Self {
            c1_kg: 20_000.0,
            c2_kg: 20_000.0,
            c3_kg: 15_000.0,
            c4_kg: 15_000.0,
        }
    }
}

impl CompartmentLimits {
    pub fn max(&self, compartment: Compartment) -> Real {
        match compartment {
            Compartment::C1 => self.c1_kg,
            Compartment::C2 => self.c2_kg,
            Compartment::C3 => self.c3_kg,
            Compartment::C4 => self.c4_kg,
        }
    }

    /// Limits from the aircraft table when it carries them, otherwise `self`.
    pub fn for_aircraft(&self, geometry: Option<&AircraftGeometry>) -> Self {
        match geometry.and_then(|g| g.max_compartment_weight) {
            Some([c1_kg, c2_kg, c3_kg, c4_kg]) => Self {
                c1_kg,
                c2_kg,
                c3_kg,
                c4_kg,
            },
            None => *self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let limits = CompartmentLimits::default();
        assert_eq!(limits.max(Compartment::C1), 20_000.0);
        assert_eq!(limits.max(Compartment::C4), 15_000.0);
        assert_eq!(limits.for_aircraft(None), limits);
    }

    #[test]
    fn aircraft_table_overrides() {
        let geometry = AircraftGeometry {
            ac_type: "789".into(),
            c: 1.0,
            k: 0.0,
            reference_arm: 0.0,
            lemac: 0.0,
            mac_formula: 100.0,
            doi: 0.0,
            cargo_delta_index: [0.0; 4],
            pax_delta_index: [0.0; 7],
            max_compartment_weight: Some([1.0, 2.0, 3.0, 4.0]),
        };
        let limits = CompartmentLimits::default().for_aircraft(Some(&geometry));
        assert_eq!(limits.max(Compartment::C3), 3.0);
    }
}
