//! Reasons a balance or fuel figure is not available.
//!
//! These are not failures of the resolution: callers fall back to a recorded
//! value or report the figure as absent, and the `Display` text is the
//! warning shown to the consumer.

use ct_aircraft::AircraftFamily;
use ct_core::Real;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MacUnavailable {
    #[error("no geometry constants for aircraft type '{ac_type}'")]
    UnknownAircraft { ac_type: String },

    #[error("zero-fuel weight must be positive to compute MAC (got {zfw} kg)")]
    NonPositiveZfw { zfw: Real },

    #[error("MAC formula divisor for aircraft type '{ac_type}' is not positive")]
    InvalidGeometry { ac_type: String },

    #[error("computed MAC {value:.2}% is outside the plausible range [0, 50]")]
    OutOfRange { value: Real },

    #[error("MAC calculation produced a non-finite value")]
    NonFinite,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuelUnavailable {
    #[error("optimized MAC is not available")]
    MissingOptimizedMac,

    #[error("baseline MAC is not available")]
    MissingBaselineMac,

    #[error("optimized MAC {mac:.2}% is outside the {family} fuel bracket range")]
    OptimizedOutOfRange { mac: Real, family: AircraftFamily },

    #[error("baseline MAC {mac:.2}% is outside the {family} fuel bracket range")]
    BaselineOutOfRange { mac: Real, family: AircraftFamily },

    #[error("trip fuel {trip_fuel_kg} kg is not a usable value")]
    InvalidTripFuel { trip_fuel_kg: Real },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_value() {
        let err = MacUnavailable::OutOfRange { value: 61.234 };
        assert!(err.to_string().contains("61.23"));

        let err = FuelUnavailable::BaselineOutOfRange {
            mac: 47.0,
            family: AircraftFamily::B772,
        };
        assert!(err.to_string().contains("772"));
    }
}
