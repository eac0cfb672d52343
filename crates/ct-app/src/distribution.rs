//! Weight distribution from a container list.
//!
//! Both builders conserve weight: the compartment totals, the side totals
//! and `total_weight_kg` agree to rounding error. Container weight that
//! cannot be attributed to a compartment is kept out of all three and
//! reported as `unplaced_weight_kg`.

use std::collections::BTreeMap;

use ct_aircraft::UldTypeCatalog;
use ct_core::{Compartment, Real, Side};
use ct_results::{Container, WeightDistribution};

fn empty_distribution() -> WeightDistribution {
    WeightDistribution {
        by_compartment: Compartment::ALL.into_iter().map(|c| (c, 0.0)).collect(),
        by_side: Side::ALL.into_iter().map(|s| (s, 0.0)).collect(),
        ..WeightDistribution::default()
    }
}

fn add_side(by_side: &mut BTreeMap<Side, Real>, side: Option<Side>, kg: Real) {
    match side {
        Some(side) => *by_side.entry(side).or_insert(0.0) += kg,
        // Centreline: half on each side.
        None => {
            for side in Side::ALL {
                *by_side.entry(side).or_insert(0.0) += kg / 2.0;
            }
        }
    }
}

/// Distribution from each container's own compartment and side.
///
/// Returns the indices of containers without a compartment; their weight is
/// in `unplaced_weight_kg` only.
pub fn from_containers(containers: &[Container]) -> (WeightDistribution, Vec<usize>) {
    let mut dist = empty_distribution();
    let mut unplaced = Vec::new();

    for (i, container) in containers.iter().enumerate() {
        let kg = container.weight_kg;
        let Some(compartment) = container.compartment else {
            dist.unplaced_weight_kg += kg;
            unplaced.push(i);
            continue;
        };
        *dist.by_compartment.entry(compartment).or_insert(0.0) += kg;
        add_side(&mut dist.by_side, container.side, kg);
        if let Some(position) = &container.position {
            *dist.by_position.entry(position.clone()).or_insert(0.0) += kg;
        }
        dist.total_weight_kg += kg;
    }
    (dist, unplaced)
}

/// Compartment split used when no container has a position: pallets lean
/// forward, smaller ULDs aft, and consecutive containers alternate.
fn heuristic_split(index: usize, uld_type: &str) -> [(Compartment, Real); 2] {
    let even = index % 2 == 0;
    match (UldTypeCatalog::is_pallet(uld_type), even) {
        (true, true) => [(Compartment::C1, 0.6), (Compartment::C2, 0.4)],
        (true, false) => [(Compartment::C2, 0.6), (Compartment::C3, 0.4)],
        (false, true) => [(Compartment::C3, 0.6), (Compartment::C4, 0.4)],
        (false, false) => [(Compartment::C4, 0.6), (Compartment::C3, 0.4)],
    }
}

/// Heuristic distribution for containers without any recorded position.
///
/// Sides alternate by index (even left, odd right) and each container's
/// weight is split over two compartments by type. The container's
/// `compartment` and `side` are set to its main share. `by_position` stays
/// empty and the result is flagged as heuristic.
pub fn heuristic(containers: &mut [Container]) -> WeightDistribution {
    let mut dist = empty_distribution();
    dist.heuristic = true;

    for (i, container) in containers.iter_mut().enumerate() {
        let kg = container.weight_kg;
        let side = if i % 2 == 0 { Side::Left } else { Side::Right };
        let split = heuristic_split(i, &container.uld_type);
        for (compartment, share) in split {
            *dist.by_compartment.entry(compartment).or_insert(0.0) += kg * share;
        }
        add_side(&mut dist.by_side, Some(side), kg);
        dist.total_weight_kg += kg;

        container.compartment = Some(split[0].0);
        container.side = Some(side);
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::{compartment_of, side_of};

    pub(crate) fn container(i: usize, serial: &str, kg: Real, position: Option<&str>) -> Container {
        Container {
            index: i,
            serial: serial.to_string(),
            uld_type: ct_aircraft::uld_type_of(serial),
            weight_kg: kg,
            max_weight_kg: None,
            position: position.map(str::to_string),
            compartment: position.and_then(compartment_of),
            side: position.and_then(side_of),
        }
    }

    #[test]
    fn positioned_containers() {
        let cs = vec![
            container(0, "PMC1", 1000.0, Some("11L")),
            container(1, "AKE2", 500.0, Some("31R")),
            container(2, "AKE3", 300.0, Some("42")),
        ];
        let (d, unplaced) = from_containers(&cs);
        assert!(unplaced.is_empty());
        assert_eq!(d.compartment(Compartment::C1), 1000.0);
        assert_eq!(d.compartment(Compartment::C2), 0.0);
        assert_eq!(d.side(Side::Left), 1150.0);
        assert_eq!(d.side(Side::Right), 650.0);
        assert_eq!(d.by_position["42"], 300.0);
        assert_eq!(d.total_weight_kg, 1800.0);
        assert!(!d.heuristic);
    }

    #[test]
    fn unpositioned_weight_is_kept_apart() {
        let cs = vec![
            container(0, "PMC1", 1000.0, Some("11L")),
            container(1, "AKE2", 400.0, None),
            container(2, "AKE3", 200.0, Some("X9")),
        ];
        let (d, unplaced) = from_containers(&cs);
        assert_eq!(unplaced, [1, 2]);
        assert_eq!(d.total_weight_kg, 1000.0);
        assert_eq!(d.unplaced_weight_kg, 600.0);
        assert!(d.by_position.get("X9").is_none());
    }

    #[test]
    fn heuristic_alternates_and_splits() {
        let mut cs = vec![
            container(0, "PMC1", 1000.0, None),
            container(1, "AKE2", 500.0, None),
        ];
        let d = heuristic(&mut cs);
        assert!(d.heuristic);
        assert!(d.by_position.is_empty());
        assert_eq!(d.side(Side::Left), 1000.0);
        assert_eq!(d.side(Side::Right), 500.0);
        assert!((d.compartment(Compartment::C1) - 600.0).abs() < 1e-9);
        assert!((d.compartment(Compartment::C2) - 400.0).abs() < 1e-9);
        assert!((d.compartment(Compartment::C4) - 300.0).abs() < 1e-9);
        assert!((d.compartment(Compartment::C3) - 200.0).abs() < 1e-9);
        assert_eq!(cs[1].compartment, Some(Compartment::C4));
        assert_eq!(cs[1].side, Some(Side::Right));
    }
}
