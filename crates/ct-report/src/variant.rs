//! Model variants. Each one writes its reports under its own root folder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    #[default]
    DelgadoVenezian,
    Baseline,
    OptimizedActual,
    BaxFixed,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 4] = [
        ModelVariant::DelgadoVenezian,
        ModelVariant::Baseline,
        ModelVariant::OptimizedActual,
        ModelVariant::BaxFixed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::DelgadoVenezian => "delgado_venezian",
            ModelVariant::Baseline => "baseline",
            ModelVariant::OptimizedActual => "optimized_actual",
            ModelVariant::BaxFixed => "bax_fixed",
        }
    }

    /// Report root folder name, relative to the project root.
    pub fn default_root(self) -> &'static str {
        match self {
            ModelVariant::DelgadoVenezian => "Results",
            ModelVariant::Baseline => "Results_Baseline",
            ModelVariant::OptimizedActual => "Results_Optimized_Actual",
            ModelVariant::BaxFixed => "Results_BAX_Fixed",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownVariant {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("baseline".parse::<ModelVariant>().unwrap(), ModelVariant::Baseline);
        assert_eq!(
            "Optimized-Actual".parse::<ModelVariant>().unwrap(),
            ModelVariant::OptimizedActual
        );
        assert!("greedy".parse::<ModelVariant>().is_err());
    }

    #[test]
    fn roots_are_distinct() {
        let mut roots: Vec<_> = ModelVariant::ALL.iter().map(|v| v.default_root()).collect();
        roots.sort();
        roots.dedup();
        assert_eq!(roots.len(), 4);
        assert_eq!(ModelVariant::default().default_root(), "Results");
    }
}
