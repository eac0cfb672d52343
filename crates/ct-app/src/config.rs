//! Settings loaded from `cargotrim.yaml`.
//!
//! Every section is optional; missing keys take the defaults below. Relative
//! paths resolve against the directory the settings file was read from.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ct_aircraft::{CompartmentLimits, ReferenceData};
use ct_balance::{EconomicsConfig, PaxWeightEstimate};
use ct_core::Real;
use ct_report::{ModelVariant, ReportLocator};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const SETTINGS_FILE: &str = "cargotrim.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory relative paths are resolved against. Not serialized.
    #[serde(skip)]
    pub base_dir: PathBuf,
    pub data_root: PathBuf,
    /// Report root per model variant; missing variants use their default
    /// folder name.
    pub report_roots: BTreeMap<ModelVariant, PathBuf>,
    pub reference: ReferenceSettings,
    pub optimizer: OptimizerSettings,
    pub economics: EconomicsConfig,
    pub assumptions: Assumptions,
    pub limits: SafetyLimits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSettings {
    pub aircraft_table: PathBuf,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            aircraft_table: PathBuf::from("Inputfiles/Main.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Program followed by its arguments. `None` disables the live tier.
    pub command: Option<Vec<String>>,
    pub timeout_s: u64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            command: None,
            timeout_s: 600,
        }
    }
}

impl OptimizerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_s)
    }
}

/// Fleet and loading assumptions used where the data has gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Added to the cargo weight to estimate ZFW when none is recorded.
    pub operating_empty_weight_kg: Real,
    pub default_trip_fuel_kg: Real,
    pub standard_passenger_mass_kg: Real,
    pub estimated_pax_weight_787_kg: Real,
    pub estimated_pax_weight_other_kg: Real,
    /// Per build-up row, when the build-up table has no weight column.
    pub estimated_weight_per_buildup_row_kg: Real,
}

impl Default for Assumptions {
    fn default() -> Self {
        let pax = PaxWeightEstimate::default();
        Self {
            operating_empty_weight_kg: 132_000.0,
            default_trip_fuel_kg: 60_000.0,
            standard_passenger_mass_kg: 84.0,
            estimated_pax_weight_787_kg: pax.weight_787_kg,
            estimated_pax_weight_other_kg: pax.weight_other_kg,
            estimated_weight_per_buildup_row_kg: 100.0,
        }
    }
}

impl Assumptions {
    pub fn pax_estimate(&self) -> PaxWeightEstimate {
        PaxWeightEstimate {
            weight_787_kg: self.estimated_pax_weight_787_kg,
            weight_other_kg: self.estimated_pax_weight_other_kg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyLimits {
    pub cg_min_percent: Real,
    pub cg_max_percent: Real,
    /// Allowed deviation of each side's share from one half.
    pub side_balance_tolerance: Real,
    /// Used when the aircraft table carries no compartment maxima.
    pub compartments: CompartmentLimits,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            cg_min_percent: 15.0,
            cg_max_percent: 35.0,
            side_balance_tolerance: 0.05,
            compartments: CompartmentLimits::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            data_root: PathBuf::from("Data"),
            report_roots: BTreeMap::new(),
            reference: ReferenceSettings::default(),
            optimizer: OptimizerSettings::default(),
            economics: EconomicsConfig::default(),
            assumptions: Assumptions::default(),
            limits: SafetyLimits::default(),
        }
    }
}

impl Settings {
    /// Defaults rooted at `project_root`.
    pub fn for_project(project_root: &Path) -> Self {
        Self {
            base_dir: project_root.to_path_buf(),
            ..Self::default()
        }
    }

    /// Load from a YAML file. Relative paths resolve against its directory.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::SettingsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut settings: Settings = serde_yaml::from_str(&content)?;
        settings.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();
        settings.validate()?;
        Ok(settings)
    }

    /// `cargotrim.yaml` in `project_root` when present, else defaults.
    pub fn discover(project_root: &Path) -> AppResult<Self> {
        let path = project_root.join(SETTINGS_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(root = %project_root.display(), "no settings file, using defaults");
            Ok(Self::for_project(project_root))
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.economics
            .validate()
            .map_err(|e| AppError::Settings(e.to_string()))?;
        let limits = &self.limits;
        if limits.cg_min_percent.partial_cmp(&limits.cg_max_percent) != Some(Ordering::Less) {
            return Err(AppError::Settings(format!(
                "cg_min_percent ({}) must be below cg_max_percent ({})",
                limits.cg_min_percent, limits.cg_max_percent
            )));
        }
        if !(0.0..=0.5).contains(&limits.side_balance_tolerance) {
            return Err(AppError::Settings(
                "side_balance_tolerance must lie in [0, 0.5]".to_string(),
            ));
        }
        if self.optimizer.timeout_s == 0 {
            return Err(AppError::Settings(
                "optimizer timeout_s must be positive".to_string(),
            ));
        }
        if let Some(command) = &self.optimizer.command
            && command.is_empty()
        {
            return Err(AppError::Settings(
                "optimizer command must name a program".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn data_root(&self) -> PathBuf {
        self.resolve(&self.data_root)
    }

    pub fn report_root(&self, variant: ModelVariant) -> PathBuf {
        match self.report_roots.get(&variant) {
            Some(root) => self.resolve(root),
            None => self.base_dir.join(variant.default_root()),
        }
    }

    pub fn aircraft_table(&self) -> PathBuf {
        self.resolve(&self.reference.aircraft_table)
    }

    pub fn report_locator(&self) -> ReportLocator {
        ModelVariant::ALL
            .into_iter()
            .fold(ReportLocator::under(&self.base_dir), |locator, v| {
                locator.with_root(v, self.report_root(v))
            })
    }

    /// Reference tables. A missing aircraft table leaves the geometry empty,
    /// so balance figures later report as unavailable.
    pub fn load_reference(&self) -> AppResult<ReferenceData> {
        let path = self.aircraft_table();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "aircraft table not found, MAC will be unavailable");
            return Ok(ReferenceData::builtin());
        }
        Ok(ReferenceData::load(&path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.optimizer.timeout_s, 600);
        assert!(s.optimizer.command.is_none());
        assert_eq!(s.economics.flights_per_year, 12_000);
        assert_eq!(s.assumptions.operating_empty_weight_kg, 132_000.0);
        assert_eq!(s.limits.cg_min_percent, 15.0);
        assert_eq!(s.limits.compartments.c3_kg, 15_000.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "economics:\n  fuel_price_usd_per_kg: 2.0\nlimits:\n  cg_max_percent: 33\n";
        let s: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.economics.fuel_price_usd_per_kg, 2.0);
        assert_eq!(s.economics.co2_kg_per_kg_fuel, 3.15);
        assert_eq!(s.limits.cg_max_percent, 33.0);
        assert_eq!(s.limits.cg_min_percent, 15.0);
        assert_eq!(s.data_root, PathBuf::from("Data"));
    }

    #[test]
    fn report_roots_by_variant() {
        let yaml = "report_roots:\n  baseline: out/base\n";
        let mut s: Settings = serde_yaml::from_str(yaml).unwrap();
        s.base_dir = PathBuf::from("/proj");
        assert_eq!(
            s.report_root(ModelVariant::Baseline),
            PathBuf::from("/proj/out/base")
        );
        assert_eq!(
            s.report_root(ModelVariant::BaxFixed),
            PathBuf::from("/proj/Results_BAX_Fixed")
        );
    }

    #[test]
    fn rejects_inverted_cg_window() {
        let mut s = Settings::default();
        s.limits.cg_min_percent = 40.0;
        assert!(matches!(s.validate(), Err(AppError::Settings(_))));
    }

    #[test]
    fn rejects_empty_command() {
        let mut s = Settings::default();
        s.optimizer.command = Some(Vec::new());
        assert!(s.validate().is_err());
    }
}
