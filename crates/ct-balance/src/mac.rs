//! Zero-fuel-weight MAC from compartment weights.
//!
//! ```text
//! zfw_index = DOI + pax_index + sum(w_i * delta_i)
//! arm       = C * (zfw_index - K) / zfw + reference_arm
//! mac       = (arm - LEMAC) / (mac_formula / 100)
//! ```
//!
//! The passenger index is a coarse approximation: the mean of the non-zero
//! per-zone pax coefficients times the total passenger weight, or a flat
//! 0.1 ratio when the table has no pax coefficients for the type. It is not
//! a seat-by-seat loading model.
//!
//! Results outside [0, 50] are reported as not available. The geometry model
//! is ill-conditioned for some edge-case inputs and such values are not
//! plausible centre-of-gravity positions.

use ct_aircraft::{AircraftGeometry, AircraftTable};
use ct_core::{Compartment, Real};
use serde::{Deserialize, Serialize};

use crate::error::MacUnavailable;

/// Plausible MAC window; anything outside is treated as a model failure.
pub const MAC_BOUNDS: (Real, Real) = (0.0, 50.0);

/// Pax index ratio used when the aircraft has no pax delta coefficients.
pub const FALLBACK_PAX_INDEX_RATIO: Real = 0.1;

/// Cargo weight per compartment, indexed by [`Compartment::slot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompartmentWeights(pub [Real; 4]);

impl CompartmentWeights {
    pub fn get(&self, compartment: Compartment) -> Real {
        self.0[compartment.slot()]
    }

    pub fn add(&mut self, compartment: Compartment, kg: Real) {
        self.0[compartment.slot()] += kg;
    }

    pub fn total(&self) -> Real {
        self.0.iter().sum()
    }
}

impl FromIterator<(Compartment, Real)> for CompartmentWeights {
    fn from_iter<I: IntoIterator<Item = (Compartment, Real)>>(iter: I) -> Self {
        let mut weights = Self::default();
        for (compartment, kg) in iter {
            weights.add(compartment, kg);
        }
        weights
    }
}

/// Total passenger weight assumed when the passenger table gives none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaxWeightEstimate {
    pub weight_787_kg: Real,
    pub weight_other_kg: Real,
}

impl Default for PaxWeightEstimate {
    fn default() -> Self {
        // ~290 passengers at 84 kg on a 787, fewer seats otherwise.
        Self {
            weight_787_kg: 24_360.0,
            weight_other_kg: 21_000.0,
        }
    }
}

impl PaxWeightEstimate {
    pub fn for_type(&self, ac_type: &str) -> Real {
        if ac_type.contains("787") {
            self.weight_787_kg
        } else {
            self.weight_other_kg
        }
    }
}

fn pax_index(geometry: &AircraftGeometry, pax_weight: Real) -> Real {
    let non_zero: Vec<Real> = geometry
        .pax_delta_index
        .iter()
        .copied()
        .filter(|d| *d != 0.0)
        .collect();
    if non_zero.is_empty() {
        pax_weight * FALLBACK_PAX_INDEX_RATIO
    } else {
        let mean = non_zero.iter().sum::<Real>() / non_zero.len() as Real;
        pax_weight * mean
    }
}

/// MAC at zero-fuel weight for one aircraft row.
pub fn mac_zfw(
    geometry: &AircraftGeometry,
    weights: &CompartmentWeights,
    zfw: Real,
    pax_weight: Real,
) -> Result<Real, MacUnavailable> {
    if !zfw.is_finite() || zfw <= 0.0 {
        return Err(MacUnavailable::NonPositiveZfw { zfw });
    }
    if geometry.mac_formula.is_nan() || geometry.mac_formula <= 0.0 {
        return Err(MacUnavailable::InvalidGeometry {
            ac_type: geometry.ac_type.clone(),
        });
    }

    let cargo_index: Real = Compartment::ALL
        .iter()
        .map(|&c| weights.get(c) * geometry.cargo_delta(c))
        .sum();
    let zfw_index = geometry.doi + pax_index(geometry, pax_weight) + cargo_index;

    let arm = geometry.c * (zfw_index - geometry.k) / zfw + geometry.reference_arm;
    let mac = (arm - geometry.lemac) / (geometry.mac_formula / 100.0);

    if !mac.is_finite() {
        return Err(MacUnavailable::NonFinite);
    }
    if mac < MAC_BOUNDS.0 || mac > MAC_BOUNDS.1 {
        return Err(MacUnavailable::OutOfRange { value: mac });
    }
    Ok(mac)
}

/// MAC calculator bound to an aircraft table.
#[derive(Debug, Clone, Copy)]
pub struct MacCalculator<'a> {
    table: &'a AircraftTable,
    pax: PaxWeightEstimate,
}

impl<'a> MacCalculator<'a> {
    pub fn new(table: &'a AircraftTable) -> Self {
        Self {
            table,
            pax: PaxWeightEstimate::default(),
        }
    }

    pub fn with_pax_estimate(mut self, pax: PaxWeightEstimate) -> Self {
        self.pax = pax;
        self
    }

    /// MAC for `ac_type`. `pax_weight` falls back to the per-type estimate.
    pub fn compute(
        &self,
        ac_type: &str,
        weights: &CompartmentWeights,
        zfw: Real,
        pax_weight: Option<Real>,
    ) -> Result<Real, MacUnavailable> {
        let geometry = self
            .table
            .get(ac_type)
            .ok_or_else(|| MacUnavailable::UnknownAircraft {
                ac_type: ac_type.to_string(),
            })?;
        let pax_weight = pax_weight.unwrap_or_else(|| self.pax.for_type(ac_type));
        let result = mac_zfw(geometry, weights, zfw, pax_weight);
        match &result {
            Ok(mac) => tracing::debug!(ac_type, zfw, mac, "computed MAC ZFW"),
            Err(reason) => tracing::debug!(ac_type, zfw, %reason, "MAC ZFW not available"),
        }
        result
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::geometry;
    use super::*;

    fn close(a: Real, b: Real) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_hold_without_pax() {
        let mac = mac_zfw(&geometry(), &CompartmentWeights::default(), 150_000.0, 0.0).unwrap();
        assert!(close(mac, 25.0));
    }

    #[test]
    fn forward_cargo_moves_mac_forward() {
        let weights = CompartmentWeights([2000.0, 0.0, 0.0, 0.0]);
        let mac = mac_zfw(&geometry(), &weights, 150_000.0, 0.0).unwrap();
        // zfw_index = 25 - 2 = 23 -> 150000 * 23 / 150000 = 23
        assert!(close(mac, 23.0));
    }

    #[test]
    fn fallback_pax_ratio() {
        let mac = mac_zfw(&geometry(), &CompartmentWeights::default(), 150_000.0, 50.0).unwrap();
        // pax index = 50 * 0.1 = 5
        assert!(close(mac, 30.0));
    }

    #[test]
    fn mean_of_non_zero_pax_coefficients() {
        let mut g = geometry();
        g.pax_delta_index = [0.02, 0.0, 0.04, 0.0, 0.0, 0.0, 0.0];
        let mac = mac_zfw(&g, &CompartmentWeights::default(), 150_000.0, 100.0).unwrap();
        // pax index = 100 * 0.03 = 3
        assert!(close(mac, 28.0));
    }

    #[test]
    fn out_of_range_is_not_available() {
        let weights = CompartmentWeights([0.0, 0.0, 0.0, 30_000.0]);
        let err = mac_zfw(&geometry(), &weights, 150_000.0, 0.0).unwrap_err();
        assert!(matches!(err, MacUnavailable::OutOfRange { value } if close(value, 55.0)));

        let weights = CompartmentWeights([30_000.0, 0.0, 0.0, 0.0]);
        let err = mac_zfw(&geometry(), &weights, 150_000.0, 0.0).unwrap_err();
        assert!(matches!(err, MacUnavailable::OutOfRange { .. }));
    }

    #[test]
    fn zero_zfw_is_not_available() {
        let err = mac_zfw(&geometry(), &CompartmentWeights::default(), 0.0, 0.0).unwrap_err();
        assert_eq!(err, MacUnavailable::NonPositiveZfw { zfw: 0.0 });
    }

    #[test]
    fn bad_divisor_is_not_available() {
        let mut g = geometry();
        g.mac_formula = 0.0;
        let err = mac_zfw(&g, &CompartmentWeights::default(), 150_000.0, 0.0).unwrap_err();
        assert!(matches!(err, MacUnavailable::InvalidGeometry { .. }));
    }

    #[test]
    fn calculator_looks_up_type() {
        let mut table = AircraftTable::default();
        table.insert(geometry());
        let calc = MacCalculator::new(&table).with_pax_estimate(PaxWeightEstimate {
            weight_787_kg: 0.0,
            weight_other_kg: 0.0,
        });
        let mac = calc
            .compute("789", &CompartmentWeights::default(), 150_000.0, None)
            .unwrap();
        assert!(close(mac, 25.0));

        let err = calc
            .compute("332", &CompartmentWeights::default(), 150_000.0, None)
            .unwrap_err();
        assert!(matches!(err, MacUnavailable::UnknownAircraft { .. }));
    }

    #[test]
    fn pax_estimate_by_type() {
        let pax = PaxWeightEstimate::default();
        assert_eq!(pax.for_type("787-10"), 24_360.0);
        assert_eq!(pax.for_type("789"), 21_000.0);
    }

    #[test]
    fn weights_from_pairs() {
        let w: CompartmentWeights = [(Compartment::C2, 10.0), (Compartment::C2, 5.0)]
            .into_iter()
            .collect();
        assert_eq!(w.get(Compartment::C2), 15.0);
        assert_eq!(w.total(), 15.0);
    }
}
