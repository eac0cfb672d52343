//! Derived metric groups computed during enrichment.

use std::collections::BTreeMap;

use ct_aircraft::{CompartmentLimits, ReferenceData};
use ct_balance::fuel_savings;
use ct_core::{Compartment, Real, Side, population_variance};
use ct_results::{
    BaselineSummary, CanonicalLoad, CargoMetrics, ComparisonMetrics, ContainerMetrics,
    DerivedMetrics, DistributionMetrics, ItemSummary, OptimizationMetrics, PerformanceMetrics,
    Provenance, SafetyMetrics, WeightBand,
};

use crate::config::Settings;

const LARGEST_ITEMS: usize = 10;

/// Upper bounds (exclusive) and labels; the last band is open.
const CARGO_BANDS: [(Real, &str); 6] = [
    (100.0, "0-100"),
    (500.0, "100-500"),
    (1000.0, "500-1000"),
    (2000.0, "1000-2000"),
    (5000.0, "2000-5000"),
    (Real::INFINITY, "5000+"),
];
const CONTAINER_BANDS: [(Real, &str); 5] = [
    (500.0, "0-500"),
    (1000.0, "500-1000"),
    (2000.0, "1000-2000"),
    (3000.0, "2000-3000"),
    (Real::INFINITY, "3000+"),
];

pub struct MetricsInput<'a> {
    pub load: &'a CanonicalLoad,
    pub baseline: Option<&'a BaselineSummary>,
    pub reference: &'a ReferenceData,
    pub settings: &'a Settings,
    pub restricted_positions: &'a [String],
    pub runtime_seconds: Real,
}

pub fn derive(input: &MetricsInput<'_>, warnings: &mut Vec<String>) -> DerivedMetrics {
    let limits = input.settings.limits.compartments.for_aircraft(
        input
            .reference
            .aircraft
            .get(&input.load.flight.aircraft_type),
    );
    let distribution = distribution_metrics(input.load, &limits);
    let comparison = input
        .baseline
        .map(|b| comparison_metrics(input, b, warnings));
    DerivedMetrics {
        containers: container_metrics(input),
        cargo: cargo_metrics(input.load),
        performance: performance_metrics(input, &distribution, comparison.as_ref()),
        optimization: optimization_metrics(input),
        safety: safety_metrics(input, &limits),
        distribution,
        comparison,
    }
}

fn mean(values: impl IntoIterator<Item = Real>) -> Option<Real> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as Real)
}

fn bands(weights: impl IntoIterator<Item = Real>, table: &[(Real, &str)]) -> Vec<WeightBand> {
    let mut counts = vec![0usize; table.len()];
    for w in weights {
        if let Some(i) = table.iter().position(|(upper, _)| w < *upper) {
            counts[i] += 1;
        }
    }
    table
        .iter()
        .zip(counts)
        .map(|((_, label), count)| WeightBand {
            label: label.to_string(),
            count,
        })
        .collect()
}

fn min_max(values: &[Real]) -> (Option<Real>, Option<Real>) {
    let min = values.iter().copied().reduce(Real::min);
    let max = values.iter().copied().reduce(Real::max);
    (min, max)
}

pub fn distribution_metrics(load: &CanonicalLoad, limits: &CompartmentLimits) -> DistributionMetrics {
    let dist = &load.distribution;
    let total = dist.total_weight_kg;
    let left = dist.side(Side::Left);
    let right = dist.side(Side::Right);
    let sides = left + right;

    let percent_by_compartment = Compartment::ALL
        .into_iter()
        .map(|c| {
            let pct = if total > 0.0 { dist.compartment(c) / total * 100.0 } else { 0.0 };
            (c, pct)
        })
        .collect();
    let percent_by_side = Side::ALL
        .into_iter()
        .map(|s| {
            let pct = if sides > 0.0 { dist.side(s) / sides * 100.0 } else { 50.0 };
            (s, pct)
        })
        .collect();
    let compartment_utilization = Compartment::ALL
        .into_iter()
        .filter(|c| limits.max(*c) > 0.0)
        .map(|c| (c, dist.compartment(c) / limits.max(c)))
        .collect();
    let weights: Vec<Real> = Compartment::ALL.iter().map(|c| dist.compartment(*c)).collect();

    DistributionMetrics {
        percent_by_compartment,
        percent_by_side,
        balance_ratio: (right > 0.0).then(|| left / right),
        compartment_utilization,
        max_weight_per_compartment: Compartment::ALL.into_iter().map(|c| (c, limits.max(c))).collect(),
        weight_variance: population_variance(&weights).unwrap_or(0.0),
    }
}

fn container_metrics(input: &MetricsInput<'_>) -> ContainerMetrics {
    let load = input.load;
    let catalog = &input.reference.uld_types;
    let containers = &load.containers;
    let max_of = |c: &ct_results::Container| {
        c.max_weight_kg.unwrap_or_else(|| catalog.max_weight(&c.uld_type))
    };

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_side: BTreeMap<Side, usize> = BTreeMap::new();
    let mut weight_by_type: BTreeMap<String, Real> = BTreeMap::new();
    let mut centreline = 0;
    let mut unpositioned = 0;
    for c in containers {
        *by_type.entry(c.uld_type.clone()).or_insert(0) += 1;
        *weight_by_type.entry(c.uld_type.clone()).or_insert(0.0) += c.weight_kg;
        match (c.compartment, c.side) {
            (None, _) => unpositioned += 1,
            (Some(_), None) => centreline += 1,
            (Some(_), Some(side)) => *by_side.entry(side).or_insert(0) += 1,
        }
    }

    let utilization_rate = mean(
        containers
            .iter()
            .filter(|c| max_of(c) > 0.0)
            .map(|c| c.weight_kg / max_of(c)),
    )
    .map(|u| u.min(1.0));
    let max_weight_by_type: BTreeMap<String, Real> = by_type
        .keys()
        .map(|t| (t.clone(), catalog.max_weight(t)))
        .collect();
    let utilization_by_type = by_type
        .iter()
        .filter(|(t, _)| max_weight_by_type[*t] > 0.0)
        .map(|(t, n)| {
            let average = weight_by_type[t] / *n as Real;
            (t.clone(), average / max_weight_by_type[t])
        })
        .collect();

    let mut items_per_container: BTreeMap<usize, usize> =
        (0..containers.len()).map(|i| (i, 0)).collect();
    for item in &load.items {
        if let Some(i) = item.container
            && let Some(n) = items_per_container.get_mut(&i)
        {
            *n += 1;
        }
    }

    let weights: Vec<Real> = containers.iter().map(|c| c.weight_kg).collect();
    let (min_weight_kg, max_weight_kg) = min_max(&weights);
    ContainerMetrics {
        total: containers.len(),
        by_type,
        by_side,
        centreline,
        unpositioned,
        utilization_rate,
        utilization_by_type,
        max_weight_by_type,
        average_items_per_container: mean(items_per_container.values().map(|n| *n as Real)),
        items_per_container,
        weight_bands: bands(weights.iter().copied().filter(|w| *w > 0.0), &CONTAINER_BANDS),
        empty_containers: weights.iter().filter(|w| **w <= 0.0).count(),
        average_weight_kg: mean(weights.iter().copied()),
        max_weight_kg,
        min_weight_kg,
    }
}

fn cargo_metrics(load: &CanonicalLoad) -> CargoMetrics {
    let items = &load.items;
    let mut items_by_commodity: BTreeMap<String, usize> = BTreeMap::new();
    let mut weight_by_commodity: BTreeMap<String, Real> = BTreeMap::new();
    for item in items {
        let key = item.commodity.clone().unwrap_or_else(|| "UNKNOWN".to_string());
        *items_by_commodity.entry(key.clone()).or_insert(0) += 1;
        *weight_by_commodity.entry(key).or_insert(0.0) += item.weight_kg;
    }

    let weights: Vec<Real> = items.iter().map(|i| i.weight_kg).collect();
    let (min_item_weight_kg, max_item_weight_kg) = min_max(&weights);
    let volumes: Vec<Real> = items.iter().filter_map(|i| i.volume_m3).collect();

    let mut largest: Vec<&ct_results::CargoItem> = items.iter().collect();
    largest.sort_by(|a, b| b.weight_kg.total_cmp(&a.weight_kg));
    let largest_items = largest
        .into_iter()
        .take(LARGEST_ITEMS)
        .map(|i| ItemSummary {
            index: i.index,
            serial: i.serial.clone(),
            weight_kg: i.weight_kg,
            commodity: i.commodity.clone(),
        })
        .collect();

    CargoMetrics {
        total_items: items.len(),
        items_by_commodity,
        weight_by_commodity,
        weight_bands: bands(weights.iter().copied(), &CARGO_BANDS),
        items_without_container: items.iter().filter(|i| i.container.is_none()).count(),
        average_item_weight_kg: mean(weights.iter().copied()),
        max_item_weight_kg,
        min_item_weight_kg,
        total_crt: items.iter().filter(|i| i.crt).count(),
        total_col: items.iter().filter(|i| i.col).count(),
        total_dangerous: items.iter().filter(|i| i.dangerous).count(),
        total_volume_m3: (!volumes.is_empty()).then(|| volumes.iter().sum()),
        largest_items,
    }
}

/// Half side-balance score, half use of the capacity left between the
/// operating empty weight and the ZFW. Side balance is left out when there
/// is no left/right ratio.
pub fn efficiency_score(
    balance_ratio: Option<Real>,
    cargo_kg: Real,
    zfw_kg: Real,
    operating_empty_weight_kg: Real,
) -> Real {
    let capacity = zfw_kg - operating_empty_weight_kg;
    let utilisation = if capacity > 0.0 {
        (cargo_kg / capacity).min(1.0)
    } else {
        0.8
    };
    match balance_ratio {
        Some(ratio) => {
            let balance = 1.0 - (1.0 - ratio).abs().min(1.0);
            0.5 * balance + 0.5 * utilisation
        }
        None => utilisation,
    }
}

fn performance_metrics(
    input: &MetricsInput<'_>,
    distribution: &DistributionMetrics,
    comparison: Option<&ComparisonMetrics>,
) -> PerformanceMetrics {
    let dist = &input.load.distribution;
    let fuel_kg = comparison.and_then(|c| c.fuel_savings_kg);
    let economics = fuel_kg.map(|kg| input.settings.economics.per_flight(kg));
    PerformanceMetrics {
        fuel_savings_kg: fuel_kg,
        fuel_savings_percent: comparison.and_then(|c| c.fuel_savings_percent),
        cost_savings_usd: economics.map(|e| e.cost_usd),
        co2_saved_kg: economics.map(|e| e.co2_kg),
        efficiency_score: Some(efficiency_score(
            distribution.balance_ratio,
            dist.total_weight_kg,
            dist.zfw_kg,
            input.settings.assumptions.operating_empty_weight_kg,
        )),
    }
}

fn optimization_metrics(input: &MetricsInput<'_>) -> OptimizationMetrics {
    let load = input.load;
    match &load.source.solver {
        Some(solver) => OptimizationMetrics {
            runtime_seconds: solver.runtime_seconds.unwrap_or(input.runtime_seconds),
            solver_status: solver.status.clone(),
            objective_value: solver.objective_value,
            gap_percent: solver.gap_percent,
        },
        None => OptimizationMetrics {
            runtime_seconds: input.runtime_seconds,
            solver_status: match load.provenance {
                Provenance::Live => "unknown".to_string(),
                other => other.as_str().to_string(),
            },
            objective_value: None,
            gap_percent: None,
        },
    }
}

fn safety_metrics(input: &MetricsInput<'_>, limits: &CompartmentLimits) -> SafetyMetrics {
    let load = input.load;
    let dist = &load.distribution;
    let safety = &input.settings.limits;
    let mut checks = Vec::new();

    let compartment_within_limits: BTreeMap<Compartment, bool> = Compartment::ALL
        .into_iter()
        .map(|c| (c, dist.compartment(c) <= limits.max(c)))
        .collect();
    checks.extend(compartment_within_limits.values().copied());

    let left = dist.side(Side::Left);
    let right = dist.side(Side::Right);
    let mut side_within_limits = BTreeMap::new();
    if left > 0.0 && right > 0.0 {
        let (lo, hi) = (
            0.5 - safety.side_balance_tolerance,
            0.5 + safety.side_balance_tolerance,
        );
        for side in Side::ALL {
            let share = dist.side(side) / (left + right);
            side_within_limits.insert(side, (lo..=hi).contains(&share));
        }
        checks.extend(side_within_limits.values().copied());
    }

    let cg_within_limits = dist
        .mac_zfw
        .map(|mac| (safety.cg_min_percent..=safety.cg_max_percent).contains(&mac));
    checks.extend(cg_within_limits);

    let restricted_positions_used = load
        .containers
        .iter()
        .filter_map(|c| c.position.as_deref())
        .filter(|p| {
            input
                .restricted_positions
                .iter()
                .any(|r| r.trim().eq_ignore_ascii_case(p))
        })
        .map(str::to_string)
        .collect();
    let overweight_containers = load
        .containers
        .iter()
        .filter(|c| c.max_weight_kg.is_some_and(|max| c.weight_kg > max))
        .map(|c| c.index)
        .collect();

    let passed = checks.iter().filter(|ok| **ok).count();
    let safety_score = if checks.is_empty() {
        1.0
    } else {
        passed as Real / checks.len() as Real
    };
    SafetyMetrics {
        compartment_within_limits,
        side_within_limits,
        cg_within_limits,
        restricted_positions_used,
        overweight_containers,
        safety_score,
    }
}

fn comparison_metrics(
    input: &MetricsInput<'_>,
    baseline: &BaselineSummary,
    warnings: &mut Vec<String>,
) -> ComparisonMetrics {
    let load = input.load;
    let dist = &load.distribution;
    let economics = &input.settings.economics;

    let weight_difference_by_compartment = Compartment::ALL
        .into_iter()
        .map(|c| {
            let base = baseline.weight_by_compartment.get(&c).copied().unwrap_or(0.0);
            (c, dist.compartment(c) - base)
        })
        .collect();
    let weight_difference_by_side = Side::ALL
        .into_iter()
        .map(|s| {
            let base = baseline.weight_by_side.get(&s).copied().unwrap_or(0.0);
            (s, dist.side(s) - base)
        })
        .collect();

    let savings = match (dist.mac_zfw, baseline.mac_zfw) {
        (Some(optimized), Some(base)) => fuel_savings(
            &input.reference.brackets,
            &load.flight.aircraft_type,
            optimized,
            base,
            baseline.trip_fuel_kg,
        ),
        (None, _) => Err(ct_balance::FuelUnavailable::MissingOptimizedMac),
        (_, None) => Err(ct_balance::FuelUnavailable::MissingBaselineMac),
    };
    let savings = match savings {
        Ok(s) => Some(s),
        Err(reason) => {
            tracing::warn!(%reason, "fuel savings not available");
            warnings.push(format!("Fuel savings not available: {reason}"));
            None
        }
    };
    let fuel_kg = savings.map(|s| s.fuel_savings_kg);
    let per_flight = fuel_kg.map(|kg| economics.per_flight(kg));

    ComparisonMetrics {
        weight_difference_by_compartment,
        weight_difference_by_side,
        container_count_difference: load.containers.len() as i64
            - baseline.container_count as i64,
        mac_difference: dist.mac_zfw.zip(baseline.mac_zfw).map(|(a, b)| a - b),
        fuel_savings_kg: fuel_kg,
        fuel_savings_percent: savings.map(|s| s.fuel_savings_percent),
        cost_savings_usd: per_flight.map(|e| e.cost_usd),
        co2_savings_kg: per_flight.map(|e| e.co2_kg),
        annual_impact: fuel_kg.map(|kg| economics.annual(kg)),
        baseline: baseline.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_results::{CargoItem, Container, FlightInfo, SourceDetails, WeightDistribution};

    fn container(index: usize, serial: &str, kg: Real, position: &str) -> Container {
        Container {
            index,
            serial: serial.into(),
            uld_type: ct_aircraft::uld_type_of(serial),
            weight_kg: kg,
            max_weight_kg: Some(ct_aircraft::UldTypeCatalog::standard().max_weight(&serial[..3])),
            position: Some(position.into()),
            compartment: ct_core::compartment_of(position),
            side: ct_core::side_of(position),
        }
    }

    fn item(index: usize, kg: Real, container: Option<usize>) -> CargoItem {
        CargoItem {
            index,
            serial: format!("074-{index:08}"),
            pieces: 1,
            weight_kg: kg,
            volume_m3: Some(1.0),
            crt: index == 0,
            col: false,
            dangerous: false,
            commodity: Some("GEN".into()),
            container,
        }
    }

    fn load() -> CanonicalLoad {
        let containers = vec![
            container(0, "PMC1", 3000.0, "11L"),
            container(1, "AKE2", 1000.0, "31R"),
            container(2, "AKE3", 2000.0, "41R"),
        ];
        let (mut distribution, _) = crate::distribution::from_containers(&containers);
        distribution.zfw_kg = 150_000.0;
        distribution.mac_zfw = Some(28.0);
        CanonicalLoad {
            flight: FlightInfo {
                aircraft_type: "789".into(),
                ..FlightInfo::default()
            },
            provenance: Provenance::Estimated,
            distribution,
            containers,
            items: vec![item(0, 50.0, Some(0)), item(1, 700.0, Some(0)), item(2, 6000.0, None)],
            source: SourceDetails::default(),
        }
    }

    fn input<'a>(
        load: &'a CanonicalLoad,
        baseline: Option<&'a BaselineSummary>,
        reference: &'a ReferenceData,
        settings: &'a Settings,
        restricted: &'a [String],
    ) -> MetricsInput<'a> {
        MetricsInput {
            load,
            baseline,
            reference,
            settings,
            restricted_positions: restricted,
            runtime_seconds: 0.5,
        }
    }

    #[test]
    fn distribution_group() {
        let l = load();
        let d = distribution_metrics(&l, &CompartmentLimits::default());
        assert_eq!(d.percent_by_compartment[&Compartment::C1], 50.0);
        assert_eq!(d.percent_by_side[&Side::Left], 50.0);
        assert_eq!(d.balance_ratio, Some(1.0));
        assert_eq!(d.compartment_utilization[&Compartment::C1], 3000.0 / 20000.0);
        // Weights 3000, 0, 1000, 2000: mean 1500.
        assert!((d.weight_variance - 1_250_000.0).abs() < 1e-6);
    }

    #[test]
    fn empty_load_splits_sides_evenly() {
        let mut l = load();
        l.containers.clear();
        l.distribution = WeightDistribution::default();
        let d = distribution_metrics(&l, &CompartmentLimits::default());
        assert_eq!(d.percent_by_side[&Side::Right], 50.0);
        assert_eq!(d.balance_ratio, None);
    }

    #[test]
    fn container_and_cargo_groups() {
        let l = load();
        let reference = ReferenceData::builtin();
        let settings = Settings::default();
        let m = derive(&input(&l, None, &reference, &settings, &[]), &mut Vec::new());

        let c = &m.containers;
        assert_eq!(c.total, 3);
        assert_eq!(c.by_type["AKE"], 2);
        assert_eq!(c.by_side[&Side::Right], 2);
        assert_eq!(c.items_per_container[&0], 2);
        assert_eq!(c.items_per_container[&2], 0);
        // 3000/4500, 1000/1588, 2000/1588 capped as a mean.
        let expected: f64 = (3000.0 / 4500.0 + 1000.0 / 1588.0 + 2000.0 / 1588.0) / 3.0;
        assert!((c.utilization_rate.unwrap() - expected.min(1.0)).abs() < 1e-9);

        let g = &m.cargo;
        assert_eq!(g.total_items, 3);
        assert_eq!(g.items_without_container, 1);
        assert_eq!(g.total_crt, 1);
        assert_eq!(g.largest_items[0].weight_kg, 6000.0);
        assert_eq!(g.total_volume_m3, Some(3.0));
        let five_k = g.weight_bands.iter().find(|b| b.label == "5000+").unwrap();
        assert_eq!(five_k.count, 1);
        assert!(m.comparison.is_none());
        assert_eq!(m.optimization.solver_status, "estimated");
    }

    #[test]
    fn safety_flags_overweight_and_restricted() {
        let l = load();
        let reference = ReferenceData::builtin();
        let settings = Settings::default();
        let restricted = vec!["41r".to_string()];
        let s = safety_metrics(
            &input(&l, None, &reference, &settings, &restricted),
            &CompartmentLimits::default(),
        );
        assert_eq!(s.restricted_positions_used, ["41R"]);
        assert_eq!(s.overweight_containers, [2]);
        assert_eq!(s.cg_within_limits, Some(true));
        assert!(s.side_within_limits[&Side::Left]);
        assert_eq!(s.safety_score, 1.0);
    }

    #[test]
    fn comparison_uses_fuel_curve() {
        let l = load();
        let reference = ReferenceData::builtin();
        let settings = Settings::default();
        let baseline = BaselineSummary {
            mac_zfw: Some(20.0),
            trip_fuel_kg: 60_000.0,
            container_count: 5,
            ..BaselineSummary::default()
        };
        let mut warnings = Vec::new();
        let m = derive(
            &input(&l, Some(&baseline), &reference, &settings, &[]),
            &mut warnings,
        );
        let cmp = m.comparison.unwrap();
        assert!((cmp.fuel_savings_kg.unwrap() + 720.0).abs() < 1e-6);
        assert!((cmp.cost_savings_usd.unwrap() + 1080.0).abs() < 1e-6);
        assert_eq!(cmp.container_count_difference, -2);
        assert_eq!(cmp.mac_difference, Some(8.0));
        assert_eq!(m.performance.fuel_savings_kg, cmp.fuel_savings_kg);
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_mac_leaves_fuel_absent_with_warning() {
        let mut l = load();
        l.distribution.mac_zfw = None;
        let reference = ReferenceData::builtin();
        let settings = Settings::default();
        let baseline = BaselineSummary {
            mac_zfw: Some(20.0),
            trip_fuel_kg: 60_000.0,
            ..BaselineSummary::default()
        };
        let mut warnings = Vec::new();
        let m = derive(
            &input(&l, Some(&baseline), &reference, &settings, &[]),
            &mut warnings,
        );
        assert!(m.comparison.unwrap().fuel_savings_kg.is_none());
        assert!(m.performance.cost_savings_usd.is_none());
        assert_eq!(m.safety.cg_within_limits, None);
        assert_eq!(warnings, ["Fuel savings not available: optimized MAC is not available"]);
    }

    #[test]
    fn efficiency_score_halves() {
        assert_eq!(efficiency_score(Some(1.0), 9000.0, 150_000.0, 132_000.0), 0.75);
        assert_eq!(efficiency_score(None, 9000.0, 150_000.0, 132_000.0), 0.5);
        assert_eq!(efficiency_score(Some(3.0), 0.0, 100_000.0, 132_000.0), 0.4);
    }
}
