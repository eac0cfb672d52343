//! Fuel-burn difference between an optimized and a baseline MAC.
//!
//! Both MAC values are looked up on the aircraft family's bracket curve; the
//! saving is the difference of the two increments, as a percentage of trip
//! fuel. Negative savings are valid results (the optimized loading burns more)
//! and are never clamped.

use ct_aircraft::{AircraftFamily, BracketCatalog};
use ct_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::FuelUnavailable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelSavings {
    pub family: AircraftFamily,
    pub model_increment_percent: Real,
    pub baseline_increment_percent: Real,
    pub fuel_savings_percent: Real,
    pub fuel_savings_kg: Real,
}

pub fn fuel_savings(
    catalog: &BracketCatalog,
    ac_type: &str,
    optimized_mac: Real,
    baseline_mac: Real,
    trip_fuel_kg: Real,
) -> Result<FuelSavings, FuelUnavailable> {
    if !trip_fuel_kg.is_finite() || trip_fuel_kg < 0.0 {
        return Err(FuelUnavailable::InvalidTripFuel { trip_fuel_kg });
    }
    let (family, curve) = catalog.for_aircraft(ac_type);

    let model = curve
        .increment_at(optimized_mac)
        .ok_or(FuelUnavailable::OptimizedOutOfRange {
            mac: optimized_mac,
            family,
        })?;
    let baseline = curve
        .increment_at(baseline_mac)
        .ok_or(FuelUnavailable::BaselineOutOfRange {
            mac: baseline_mac,
            family,
        })?;

    let percent = model - baseline;
    let savings = FuelSavings {
        family,
        model_increment_percent: model,
        baseline_increment_percent: baseline,
        fuel_savings_percent: percent,
        fuel_savings_kg: trip_fuel_kg * percent / 100.0,
    };
    tracing::debug!(
        ac_type,
        %family,
        optimized_mac,
        baseline_mac,
        percent,
        kg = savings.fuel_savings_kg,
        "fuel savings"
    );
    Ok(savings)
}
