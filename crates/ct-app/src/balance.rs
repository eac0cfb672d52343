//! Settling the balance index of a canonical load.

use ct_balance::{CompartmentWeights, MacCalculator};
use ct_core::Real;
use ct_results::CanonicalLoad;

/// Fills `distribution.mac_zfw` when the tier left it empty.
///
/// Order: the tier's own value (a report line), the calculator, the MAC
/// recorded in the flight header. Each step down adds a warning; when all
/// fail the index stays `None`.
pub fn settle_mac(
    load: &mut CanonicalLoad,
    calculator: &MacCalculator<'_>,
    recorded_mac: Option<Real>,
    warnings: &mut Vec<String>,
) {
    if load.distribution.mac_zfw.is_some() {
        return;
    }
    let dist = &load.distribution;
    let weights: CompartmentWeights = dist
        .by_compartment
        .iter()
        .map(|(c, kg)| (*c, *kg))
        .collect();
    let computed = calculator.compute(
        &load.flight.aircraft_type,
        &weights,
        dist.zfw_kg,
        load.source.pax_weight_kg,
    );
    load.distribution.mac_zfw = match computed {
        Ok(mac) => Some(mac),
        Err(reason) => {
            tracing::warn!(%reason, "MAC ZFW calculation unavailable");
            match recorded_mac {
                Some(mac) => {
                    warnings.push(format!(
                        "MAC ZFW calculation unavailable ({reason}); using the recorded MAC ZFW"
                    ));
                    Some(mac)
                }
                None => {
                    warnings.push(format!(
                        "MAC ZFW not available: {reason}, and no MAC ZFW is recorded"
                    ));
                    None
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_aircraft::AircraftTable;
    use ct_results::{FlightInfo, Provenance, SourceDetails, WeightDistribution};

    fn load(mac: Option<Real>) -> CanonicalLoad {
        CanonicalLoad {
            flight: FlightInfo {
                aircraft_type: "789".into(),
                ..FlightInfo::default()
            },
            provenance: Provenance::Estimated,
            distribution: WeightDistribution {
                zfw_kg: 150_000.0,
                mac_zfw: mac,
                ..WeightDistribution::default()
            },
            containers: Vec::new(),
            items: Vec::new(),
            source: SourceDetails::default(),
        }
    }

    #[test]
    fn tier_value_is_kept() {
        let table = AircraftTable::default();
        let mut l = load(Some(21.0));
        let mut warnings = Vec::new();
        settle_mac(&mut l, &MacCalculator::new(&table), Some(30.0), &mut warnings);
        assert_eq!(l.distribution.mac_zfw, Some(21.0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_aircraft_falls_back_to_recorded() {
        let table = AircraftTable::default();
        let mut l = load(None);
        let mut warnings = Vec::new();
        settle_mac(&mut l, &MacCalculator::new(&table), Some(24.5), &mut warnings);
        assert_eq!(l.distribution.mac_zfw, Some(24.5));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("789"));
    }

    #[test]
    fn nothing_available_stays_none() {
        let table = AircraftTable::default();
        let mut l = load(None);
        let mut warnings = Vec::new();
        settle_mac(&mut l, &MacCalculator::new(&table), None, &mut warnings);
        assert_eq!(l.distribution.mac_zfw, None);
        assert_eq!(warnings.len(), 1);
    }
}
