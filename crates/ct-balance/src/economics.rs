//! Cost and emissions derived from a fuel figure.
//!
//! The constants are fleet-level assumptions, not measurements, and are
//! supplied by configuration.

use ct_core::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Flights per year used to scale a single-flight saving.
    pub flights_per_year: u32,
    /// Bulk jet fuel price.
    pub fuel_price_usd_per_kg: Real,
    pub co2_kg_per_kg_fuel: Real,
    pub fuel_density_kg_per_l: Real,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            flights_per_year: 12_000,
            fuel_price_usd_per_kg: 1.50,
            co2_kg_per_kg_fuel: 3.15,
            fuel_density_kg_per_l: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightEconomics {
    pub fuel_kg: Real,
    pub cost_usd: Real,
    pub co2_kg: Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualImpact {
    pub flights_per_year: u32,
    pub fuel_savings_per_year_kg: Real,
    pub fuel_savings_per_year_liters: Real,
    pub cost_savings_per_year_usd: Real,
    pub co2_reduction_per_year_kg: Real,
    pub co2_reduction_per_year_tons: Real,
    pub fuel_price_usd_per_kg: Real,
}

impl EconomicsConfig {
    pub fn per_flight(&self, fuel_kg: Real) -> FlightEconomics {
        FlightEconomics {
            fuel_kg,
            cost_usd: fuel_kg * self.fuel_price_usd_per_kg,
            co2_kg: fuel_kg * self.co2_kg_per_kg_fuel,
        }
    }

    /// Scales a single-flight fuel saving to a year of operations. Negative
    /// savings are projected as well, showing the yearly cost.
    pub fn annual(&self, fuel_kg_per_flight: Real) -> AnnualImpact {
        let flights = Real::from(self.flights_per_year);
        let fuel = fuel_kg_per_flight * flights;
        let co2 = fuel * self.co2_kg_per_kg_fuel;
        AnnualImpact {
            flights_per_year: self.flights_per_year,
            fuel_savings_per_year_kg: fuel,
            fuel_savings_per_year_liters: fuel / self.fuel_density_kg_per_l,
            cost_savings_per_year_usd: fuel * self.fuel_price_usd_per_kg,
            co2_reduction_per_year_kg: co2,
            co2_reduction_per_year_tons: co2 / 1000.0,
            fuel_price_usd_per_kg: self.fuel_price_usd_per_kg,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.fuel_density_kg_per_l.is_finite() && self.fuel_density_kg_per_l > 0.0) {
            return Err("fuel density must be positive");
        }
        if !self.fuel_price_usd_per_kg.is_finite() || !self.co2_kg_per_kg_fuel.is_finite() {
            return Err("fuel price and CO2 factor must be finite");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Real, b: Real) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn per_flight_figures() {
        let e = EconomicsConfig::default().per_flight(-720.0);
        assert!(close(e.cost_usd, -1080.0));
        assert!(close(e.co2_kg, -2268.0));
    }

    #[test]
    fn annual_projection() {
        let a = EconomicsConfig::default().annual(100.0);
        assert_eq!(a.flights_per_year, 12_000);
        assert!(close(a.fuel_savings_per_year_kg, 1_200_000.0));
        assert!(close(a.fuel_savings_per_year_liters, 1_500_000.0));
        assert!(close(a.cost_savings_per_year_usd, 1_800_000.0));
        assert!(close(a.co2_reduction_per_year_kg, 3_780_000.0));
        assert!(close(a.co2_reduction_per_year_tons, 3_780.0));
    }

    #[test]
    fn configurable_constants() {
        let cfg = EconomicsConfig {
            flights_per_year: 10,
            fuel_price_usd_per_kg: 2.0,
            ..EconomicsConfig::default()
        };
        let a = cfg.annual(5.0);
        assert!(close(a.cost_savings_per_year_usd, 100.0));
    }

    #[test]
    fn rejects_zero_density() {
        let cfg = EconomicsConfig {
            fuel_density_kg_per_l: 0.0,
            ..EconomicsConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(EconomicsConfig::default().validate().is_ok());
    }
}
