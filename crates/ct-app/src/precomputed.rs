//! Precomputed tier: a solver report written by an earlier run.

use ct_core::{Real, Tolerances, nearly_equal};
use ct_report::PrecomputedReport;
use ct_results::{CanonicalLoad, Container, Provenance, SourceDetails};

use crate::canonical::{TierContext, assign_by_air_waybill, items_from_pieces};
use crate::distribution;

/// Report compartment lines further than this from the container sums
/// raise a warning.
const COMPARTMENT_MISMATCH_KG: Real = 1.0;

/// Canonical load from a usable report (one with at least one placement).
pub fn from_report(
    report: PrecomputedReport,
    ctx: &TierContext<'_>,
    warnings: &mut Vec<String>,
) -> CanonicalLoad {
    let parsed = report.parsed;
    let containers: Vec<Container> = parsed
        .containers
        .iter()
        .enumerate()
        .map(|(i, p)| ctx.container(i, &p.serial, p.weight_kg, Some(p.position.clone())))
        .collect();

    let mut items = items_from_pieces(&ctx.tables.pieces);
    let assigned = assign_by_air_waybill(&mut items, &ctx.tables.buildup, &containers);
    tracing::debug!(assigned, items = items.len(), "assigned items through build-up waybills");

    let (mut dist, unplaced) = distribution::from_containers(&containers);
    if !unplaced.is_empty() {
        warnings.push(format!(
            "{} report placement(s) have a position outside compartments 1-4; {:.1} kg left out of the distribution",
            unplaced.len(),
            dist.unplaced_weight_kg
        ));
    }

    let tol = Tolerances {
        abs: COMPARTMENT_MISMATCH_KG,
        rel: 0.0,
    };
    for (compartment, reported) in &parsed.weight_by_compartment {
        let summed = dist.compartment(*compartment);
        if !nearly_equal(*reported, summed, tol) {
            warnings.push(format!(
                "Report states {reported:.1} kg in {compartment} but its placements sum to {summed:.1} kg"
            ));
        }
    }
    if let Some(declared) = parsed.declared_container_count
        && declared as usize != containers.len()
    {
        warnings.push(format!(
            "Report declares {declared} ULDs but {} placements were parsed",
            containers.len()
        ));
    }

    let general = report.general.as_ref();
    dist.zfw_kg = ctx.zfw(
        &[
            general.and_then(|g| g.zfw_kg),
            ctx.tables.header.zero_fuel_weight_kg,
        ],
        dist.total_weight_kg,
        warnings,
    );
    dist.mac_zfw = parsed.mac_zfw;
    if parsed.mac_zfw.is_none() {
        warnings.push("Report has no %MAC ZFW line".to_string());
    }

    let mut flight = ctx.flight_info();
    if flight.aircraft_type.is_empty()
        && let Some(ac_type) = general.and_then(|g| g.aircraft_type.clone())
    {
        flight.aircraft_type = ac_type;
    }

    let source = SourceDetails {
        report_dir: Some(report.dir),
        report_weight_by_compartment: parsed.weight_by_compartment.clone(),
        report_mac_zfw: parsed.mac_zfw,
        report_fuel_deviation_kg: parsed.fuel_deviation_kg,
        declared_container_count: parsed.declared_container_count,
        solver: None,
        pax_weight_kg: ctx.tables.pax.map(|p| p.total_weight_kg),
    };

    CanonicalLoad {
        flight,
        provenance: Provenance::Precomputed,
        distribution: dist,
        containers,
        items,
        source,
    }
}

