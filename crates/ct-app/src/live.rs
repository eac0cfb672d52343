//! Live tier: the optimizer's own solution.

use ct_core::{compartment_of, side_of};
use ct_report::ModelVariant;
use ct_results::{CanonicalLoad, Container, Provenance, SolverSummary, SourceDetails};

use crate::canonical::{TierContext, items_from_pieces};
use crate::distribution;
use crate::optimizer::{OptimizerError, SolveInputs, SolveOutcome};

pub fn solve_inputs(
    ctx: &TierContext<'_>,
    restricted_positions: &[String],
    variant: ModelVariant,
) -> SolveInputs {
    SolveInputs {
        flight_path: ctx.identity.path.clone(),
        files: ctx.tables.files.clone(),
        aircraft_type: ctx.aircraft_type().to_string(),
        arrival_airport: ctx.tables.header.arrival_airport.clone(),
        restricted_positions: restricted_positions.to_vec(),
        variant,
    }
}

/// Canonical load from an optimizer outcome. An outcome without containers
/// is not a solution.
pub fn from_outcome(
    outcome: SolveOutcome,
    ctx: &TierContext<'_>,
    warnings: &mut Vec<String>,
) -> Result<CanonicalLoad, OptimizerError> {
    if outcome.containers.is_empty() {
        return Err(OptimizerError::NoSolution {
            status: outcome.status,
        });
    }

    let catalog = &ctx.reference.uld_types;
    let containers: Vec<Container> = outcome
        .containers
        .iter()
        .enumerate()
        .map(|(index, solved)| {
            let uld_type = solved
                .uld_type
                .clone()
                .unwrap_or_else(|| ct_aircraft::uld_type_of(&solved.serial));
            let max_weight_kg = solved
                .max_weight_kg
                .or_else(|| Some(catalog.max_weight(&uld_type)));
            let position = solved.position.clone();
            Container {
                index,
                serial: solved.serial.clone(),
                uld_type,
                weight_kg: solved.weight_kg,
                max_weight_kg,
                compartment: position.as_deref().and_then(compartment_of),
                side: position.as_deref().and_then(side_of),
                position,
            }
        })
        .collect();

    let mut items = items_from_pieces(&ctx.tables.pieces);
    let mut dangling = 0;
    for a in &outcome.assignments {
        match items.get_mut(a.item_index) {
            Some(item) if a.container_index < containers.len() => {
                item.container = Some(a.container_index)
            }
            _ => dangling += 1,
        }
    }
    if dangling > 0 {
        warnings.push(format!(
            "Ignored {dangling} optimizer assignment(s) referring to unknown items or containers"
        ));
    }

    let (mut dist, unplaced) = distribution::from_containers(&containers);
    if !unplaced.is_empty() {
        warnings.push(format!(
            "{} container(s) from the optimizer have no usable position; {:.1} kg left out of the distribution",
            unplaced.len(),
            dist.unplaced_weight_kg
        ));
    }
    dist.zfw_kg = ctx.zfw(
        &[ctx.tables.header.zero_fuel_weight_kg],
        dist.total_weight_kg,
        warnings,
    );

    let source = SourceDetails {
        solver: Some(SolverSummary {
            status: outcome.status,
            objective_value: outcome.objective_value,
            gap_percent: outcome.gap_percent,
            runtime_seconds: outcome.runtime_seconds,
        }),
        pax_weight_kg: ctx.tables.pax.map(|p| p.total_weight_kg),
        ..SourceDetails::default()
    };

    Ok(CanonicalLoad {
        flight: ctx.flight_info(),
        provenance: Provenance::Live,
        distribution: dist,
        containers,
        items,
        source,
    })
}
