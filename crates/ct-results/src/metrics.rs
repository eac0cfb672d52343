//! Derived metric groups attached during enrichment.
//!
//! Figures that cannot be computed are `None`; no group invents a value.

use std::collections::BTreeMap;

use ct_balance::AnnualImpact;
use ct_core::{Compartment, Real, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub distribution: DistributionMetrics,
    pub containers: ContainerMetrics,
    pub cargo: CargoMetrics,
    pub performance: PerformanceMetrics,
    pub optimization: OptimizationMetrics,
    pub safety: SafetyMetrics,
    /// Absent when no as-loaded baseline could be read.
    pub comparison: Option<ComparisonMetrics>,
}

/// Count of values in one weight band, e.g. `500-1000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightBand {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionMetrics {
    pub percent_by_compartment: BTreeMap<Compartment, Real>,
    pub percent_by_side: BTreeMap<Side, Real>,
    /// Left over right weight; `None` when nothing sits on the right.
    pub balance_ratio: Option<Real>,
    pub compartment_utilization: BTreeMap<Compartment, Real>,
    pub max_weight_per_compartment: BTreeMap<Compartment, Real>,
    /// Population variance of the four compartment weights.
    pub weight_variance: Real,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_side: BTreeMap<Side, usize>,
    pub centreline: usize,
    pub unpositioned: usize,
    /// Mean of per-container weight / max weight, capped at 1.
    pub utilization_rate: Option<Real>,
    pub utilization_by_type: BTreeMap<String, Real>,
    pub max_weight_by_type: BTreeMap<String, Real>,
    pub items_per_container: BTreeMap<usize, usize>,
    pub average_items_per_container: Option<Real>,
    pub weight_bands: Vec<WeightBand>,
    pub empty_containers: usize,
    pub average_weight_kg: Option<Real>,
    pub max_weight_kg: Option<Real>,
    pub min_weight_kg: Option<Real>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub index: usize,
    pub serial: String,
    pub weight_kg: Real,
    pub commodity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoMetrics {
    pub total_items: usize,
    pub items_by_commodity: BTreeMap<String, usize>,
    pub weight_by_commodity: BTreeMap<String, Real>,
    pub weight_bands: Vec<WeightBand>,
    pub items_without_container: usize,
    pub average_item_weight_kg: Option<Real>,
    pub max_item_weight_kg: Option<Real>,
    pub min_item_weight_kg: Option<Real>,
    pub total_crt: usize,
    pub total_col: usize,
    pub total_dangerous: usize,
    pub total_volume_m3: Option<Real>,
    /// Heaviest items first.
    pub largest_items: Vec<ItemSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub fuel_savings_kg: Option<Real>,
    pub fuel_savings_percent: Option<Real>,
    pub cost_savings_usd: Option<Real>,
    pub co2_saved_kg: Option<Real>,
    /// Half side-balance score, half capacity utilisation.
    pub efficiency_score: Option<Real>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub runtime_seconds: Real,
    pub solver_status: String,
    pub objective_value: Option<Real>,
    pub gap_percent: Option<Real>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetyMetrics {
    pub compartment_within_limits: BTreeMap<Compartment, bool>,
    /// Empty unless both sides carry weight.
    pub side_within_limits: BTreeMap<Side, bool>,
    /// `None` when the balance index is not available.
    pub cg_within_limits: Option<bool>,
    pub restricted_positions_used: Vec<String>,
    /// Indices of containers heavier than their maximum.
    pub overweight_containers: Vec<usize>,
    /// Share of passed checks, 1.0 when nothing could be checked.
    pub safety_score: Real,
}

/// As-loaded figures the result is compared against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineSummary {
    pub mac_zfw: Option<Real>,
    pub weight_by_compartment: BTreeMap<Compartment, Real>,
    pub weight_by_side: BTreeMap<Side, Real>,
    pub weight_by_position: BTreeMap<String, Real>,
    pub total_weight_kg: Real,
    pub container_count: usize,
    pub trip_fuel_kg: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub baseline: BaselineSummary,
    pub weight_difference_by_compartment: BTreeMap<Compartment, Real>,
    pub weight_difference_by_side: BTreeMap<Side, Real>,
    pub container_count_difference: i64,
    pub mac_difference: Option<Real>,
    pub fuel_savings_kg: Option<Real>,
    pub fuel_savings_percent: Option<Real>,
    pub cost_savings_usd: Option<Real>,
    pub co2_savings_kg: Option<Real>,
    pub annual_impact: Option<AnnualImpact>,
}
