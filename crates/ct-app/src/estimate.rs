//! Estimate tier: containers and distribution straight from the input tables.
//!
//! Always produces a load. Containers come from the build-up table, their
//! positions from the load-location table. Without any position the
//! compartment and side split falls back to [`distribution::heuristic`].

use std::collections::HashMap;

use ct_core::{Real, round2};
use ct_results::{CanonicalLoad, Container, Provenance, SourceDetails};
use ct_tables::LoadLocationRow;

use crate::canonical::{TierContext, assign_by_air_waybill, items_from_pieces};
use crate::distribution;

/// ULD serial to recorded position; later rows win.
fn positions(rows: &[LoadLocationRow]) -> HashMap<&str, &str> {
    rows.iter()
        .filter_map(|r| Some((r.serial.as_deref()?, r.location.as_deref()?)))
        .collect()
}

pub fn from_tables(ctx: &TierContext<'_>, warnings: &mut Vec<String>) -> CanonicalLoad {
    let tables = ctx.tables;
    let buildup = &tables.buildup;
    let per_row_kg = ctx.settings.assumptions.estimated_weight_per_buildup_row_kg;

    if !buildup.has_uld_column {
        warnings.push("Build-up table has no ULD column; no containers could be derived".to_string());
    } else if !buildup.has_weight_column {
        warnings.push(format!(
            "Build-up table has no weight column; container weights estimated at {per_row_kg:.0} kg per row"
        ));
    }
    let location_map = tables.load_locations.as_deref().map(positions);
    if location_map.is_none() {
        warnings.push("No load-location table; container positions unknown".to_string());
    }

    let mut containers: Vec<Container> = buildup
        .uld_serials()
        .into_iter()
        .enumerate()
        .map(|(i, serial)| {
            let rows: Vec<_> = buildup.rows_for(serial).collect();
            let weight: Real = if buildup.has_weight_column {
                rows.iter().filter_map(|r| r.weight_kg).sum()
            } else {
                rows.len() as Real * per_row_kg
            };
            let position = location_map
                .as_ref()
                .and_then(|m| m.get(serial))
                .map(|p| p.to_string());
            ctx.container(i, serial, round2(weight), position)
        })
        .collect();

    let any_position = containers.iter().any(|c| c.position.is_some());
    let mut dist = if any_position {
        let (dist, unplaced) = distribution::from_containers(&containers);
        if !unplaced.is_empty() {
            warnings.push(format!(
                "{} container(s) have no usable recorded position; {:.1} kg left out of the distribution",
                unplaced.len(),
                dist.unplaced_weight_kg
            ));
        }
        dist
    } else {
        if !containers.is_empty() {
            warnings.push(
                "No container positions recorded; compartment and side split estimated heuristically"
                    .to_string(),
            );
        }
        distribution::heuristic(&mut containers)
    };

    let mut items = items_from_pieces(&tables.pieces);
    assign_by_air_waybill(&mut items, buildup, &containers);

    dist.zfw_kg = ctx.zfw(
        &[tables.header.zero_fuel_weight_kg],
        dist.total_weight_kg,
        warnings,
    );

    CanonicalLoad {
        flight: ctx.flight_info(),
        provenance: Provenance::Estimated,
        distribution: dist,
        containers,
        items,
        source: SourceDetails {
            pax_weight_kg: tables.pax.map(|p| p.total_weight_kg),
            ..SourceDetails::default()
        },
    }
}
