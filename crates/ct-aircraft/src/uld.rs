//! ULD type catalog.

use std::collections::BTreeMap;

use ct_core::Real;

/// Placeholder type for serials too short to carry a type prefix.
pub const UNKNOWN_ULD_TYPE: &str = "UNK";

/// Three-letter type prefix of a ULD serial (`PMC32298KL` -> `PMC`).
pub fn uld_type_of(serial: &str) -> String {
    let serial = serial.trim();
    if serial.chars().count() >= 3 {
        serial.chars().take(3).collect::<String>().to_ascii_uppercase()
    } else {
        UNKNOWN_ULD_TYPE.to_string()
    }
}

/// Maximum gross weight per ULD type code.
#[derive(Debug, Clone, PartialEq)]
pub struct UldTypeCatalog {
    max_weight: BTreeMap<String, Real>,
    fallback_kg: Real,
}

impl UldTypeCatalog {
    /// Main-deck pallets (PMC, PAG, AAP) at 4500 kg, lower-deck containers
    /// (AKE, AAK) at 1588 kg, anything else at 3000 kg.
    pub fn standard() -> Self {
        let mut max_weight = BTreeMap::new();
        for code in ["PMC", "PAG", "AAP"] {
            max_weight.insert(code.to_string(), 4500.0);
        }
        for code in ["AKE", "AAK"] {
            max_weight.insert(code.to_string(), 1588.0);
        }
        Self {
            max_weight,
            fallback_kg: 3000.0,
        }
    }

    pub fn with_type(mut self, code: &str, max_weight_kg: Real) -> Self {
        self.max_weight
            .insert(code.to_ascii_uppercase(), max_weight_kg);
        self
    }

    pub fn max_weight(&self, uld_type: &str) -> Real {
        self.max_weight
            .get(&uld_type.to_ascii_uppercase())
            .copied()
            .unwrap_or(self.fallback_kg)
    }

    /// Pallet types that the estimate heuristic places forward.
    pub fn is_pallet(uld_type: &str) -> bool {
        matches!(uld_type, "PMC" | "PAG" | "AAP")
    }
}

impl Default for UldTypeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
