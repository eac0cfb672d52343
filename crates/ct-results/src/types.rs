//! Canonical result schema.
//!
//! Every resolution tier produces a [`CanonicalLoad`]. The enrichment stage
//! turns it into a [`ResolvedResult`] by attaching [`DerivedMetrics`]; nothing
//! else changes a load once a tier has built it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ct_core::{Compartment, Real, Side};
use serde::{Deserialize, Serialize};

use crate::metrics::DerivedMetrics;

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Fresh output of the optimizer.
    Live,
    /// Parsed from a solver report written earlier.
    Precomputed,
    /// Derived from the raw input tables with heuristics.
    Estimated,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Precomputed => "precomputed",
            Provenance::Estimated => "estimated",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightInfo {
    /// The flight path as requested.
    pub path: String,
    pub flight_number: String,
    pub route: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub date: String,
    pub aircraft_type: String,
    pub aircraft_registration: Option<String>,
}

/// A ULD as placed in this result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub index: usize,
    pub serial: String,
    pub uld_type: String,
    pub weight_kg: Real,
    pub max_weight_kg: Option<Real>,
    pub position: Option<String>,
    pub compartment: Option<Compartment>,
    pub side: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoItem {
    pub index: usize,
    pub serial: String,
    pub pieces: u32,
    pub weight_kg: Real,
    pub volume_m3: Option<Real>,
    /// Temperature-controlled.
    pub crt: bool,
    /// Cold chain.
    pub col: bool,
    pub dangerous: bool,
    pub commodity: Option<String>,
    /// Index into the container list; `None` is valid.
    pub container: Option<usize>,
}

/// Where the cargo weight sits.
///
/// `by_compartment`, `by_side` and `total_weight_kg` always agree. Weight of
/// containers without a usable position is kept out of all three and shown
/// as `unplaced_weight_kg`. `by_position` only covers recorded positions, so
/// it is empty when the distribution was estimated heuristically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightDistribution {
    pub by_compartment: BTreeMap<Compartment, Real>,
    pub by_side: BTreeMap<Side, Real>,
    /// Weight per recorded position. Empty when `heuristic` is true; the
    /// position-sum check only applies to position-driven distributions.
    pub by_position: BTreeMap<String, Real>,
    pub total_weight_kg: Real,
    pub unplaced_weight_kg: Real,
    pub zfw_kg: Real,
    /// Balance index at zero-fuel weight; `None` when not available.
    pub mac_zfw: Option<Real>,
    /// Compartment and side split came from a heuristic, not positions.
    pub heuristic: bool,
}

impl WeightDistribution {
    pub fn compartment(&self, c: Compartment) -> Real {
        self.by_compartment.get(&c).copied().unwrap_or(0.0)
    }

    pub fn side(&self, s: Side) -> Real {
        self.by_side.get(&s).copied().unwrap_or(0.0)
    }
}

/// Solver figures carried by a live outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverSummary {
    pub status: String,
    pub objective_value: Option<Real>,
    pub gap_percent: Option<Real>,
    pub runtime_seconds: Option<Real>,
}

/// Source facts kept next to the canonical figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDetails {
    pub report_dir: Option<PathBuf>,
    /// `Weight in Compartment` lines as written in the report.
    pub report_weight_by_compartment: BTreeMap<Compartment, Real>,
    pub report_mac_zfw: Option<Real>,
    pub report_fuel_deviation_kg: Option<Real>,
    pub declared_container_count: Option<u32>,
    pub solver: Option<SolverSummary>,
    /// Passenger weight used for the balance index, when known.
    pub pax_weight_kg: Option<Real>,
}

/// Output of one resolution tier, before derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLoad {
    pub flight: FlightInfo,
    pub provenance: Provenance,
    pub distribution: WeightDistribution,
    pub containers: Vec<Container>,
    pub items: Vec<CargoItem>,
    pub source: SourceDetails,
}

/// The pipeline's answer for one flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResult {
    pub success: bool,
    pub error_message: Option<String>,
    pub flight: FlightInfo,
    pub provenance: Option<Provenance>,
    pub distribution: WeightDistribution,
    pub containers: Vec<Container>,
    pub items: Vec<CargoItem>,
    pub metrics: Option<DerivedMetrics>,
    pub source: Option<SourceDetails>,
    /// Degradations, in the order they happened.
    pub warnings: Vec<String>,
    pub runtime_seconds: Real,
}

impl ResolvedResult {
    /// Final stage: a tier's load plus its derived metrics.
    pub fn enriched(
        load: CanonicalLoad,
        metrics: DerivedMetrics,
        warnings: Vec<String>,
        runtime_seconds: Real,
    ) -> Self {
        Self {
            success: true,
            error_message: None,
            flight: load.flight,
            provenance: Some(load.provenance),
            distribution: load.distribution,
            containers: load.containers,
            items: load.items,
            metrics: Some(metrics),
            source: Some(load.source),
            warnings,
            runtime_seconds,
        }
    }

    pub fn failed(
        flight_path: &str,
        message: impl Into<String>,
        warnings: Vec<String>,
        runtime_seconds: Real,
    ) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            flight: FlightInfo {
                path: flight_path.to_string(),
                ..FlightInfo::default()
            },
            provenance: None,
            distribution: WeightDistribution::default(),
            containers: Vec::new(),
            items: Vec::new(),
            metrics: None,
            source: None,
            warnings,
            runtime_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Provenance::Precomputed).unwrap(),
            "\"precomputed\""
        );
    }

    #[test]
    fn failed_result_has_no_provenance() {
        let r = ResolvedResult::failed("x/y", "boom", vec!["w".into()], 0.1);
        assert!(!r.success);
        assert_eq!(r.error_message.as_deref(), Some("boom"));
        assert_eq!(r.flight.path, "x/y");
        assert!(r.provenance.is_none());
        assert_eq!(r.warnings, ["w"]);
    }

    #[test]
    fn distribution_maps_serialize_with_named_keys() {
        let mut d = WeightDistribution::default();
        d.by_compartment.insert(Compartment::C1, 10.0);
        d.by_side.insert(Side::Left, 10.0);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["by_compartment"]["C1"], 10.0);
        assert_eq!(json["by_side"]["Left"], 10.0);
        assert_eq!(d.compartment(Compartment::C2), 0.0);
    }
}
