//! ct-balance: weight-and-balance and fuel-savings calculations.
//!
//! Pure functions over injected reference data:
//! - [`mac`]: zero-fuel-weight MAC from compartment weights and geometry
//! - [`fuel`]: fuel-burn difference between two MAC values
//! - [`economics`]: per-flight cost/CO2 and annual fleet projection

pub mod economics;
pub mod error;
pub mod fuel;
pub mod mac;

pub use economics::{AnnualImpact, EconomicsConfig, FlightEconomics};
pub use error::{FuelUnavailable, MacUnavailable};
pub use fuel::{FuelSavings, fuel_savings};
pub use mac::{CompartmentWeights, MacCalculator, PaxWeightEstimate, mac_zfw};
