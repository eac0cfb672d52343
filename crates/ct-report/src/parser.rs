//! Free-text solver report parser.
//!
//! Placement lines come in two shapes, with or without load-factor metadata
//! between the weight and the position:
//!
//! ```text
//! ULD PAG-26 with weight 88.0 kg with a volume loadfactor of 0.4 is loaded to position 21R
//! ULD PMC32298KL with weight 1234.5 kg is loaded to position 11L
//! ```
//!
//! Each placement extractor yields candidates independently. Candidates are
//! merged on `(serial, position)` so a line matched by several extractors is
//! recorded once, then ordered by their offset in the text.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use ct_core::{Compartment, Real, Side, compartment_of, side_of};
use regex::Regex;
use serde::{Deserialize, Serialize};

static PLACEMENT_WITH_METADATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ULD ([A-Z0-9-]+) with weight (\d+(?:\.\d+)?) kg.*?loaded to position (\w+)")
        .expect("placement pattern is valid")
});
static PLACEMENT_SIMPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ULD ([A-Z0-9-]+) with weight (\d+(?:\.\d+)?) kg is loaded to position (\w+)")
        .expect("placement pattern is valid")
});
static COMPARTMENT_WEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Weight in Compartment ([1-4]): (\d+(?:\.\d+)?) kg")
        .expect("compartment weight pattern is valid")
});
static MAC_ZFW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%MAC ZFW is (\d+(?:\.\d+)?)").expect("MAC pattern is valid"));
static FUEL_DEVIATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Resulting in a fuel deviation of.*?or (-?\d+(?:\.\d+)?) kg")
        .expect("fuel deviation pattern is valid")
});
static DECLARED_COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) ULDs are built by the model").expect("ULD count pattern is valid")
});

/// Placement extractors, strictest first.
static PLACEMENT_EXTRACTORS: [&LazyLock<Regex>; 2] =
    [&PLACEMENT_WITH_METADATA_RE, &PLACEMENT_SIMPLE_RE];

/// One container placement read from the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub serial: String,
    pub weight_kg: Real,
    pub position: String,
    /// `None` when the position does not start with a compartment digit.
    pub compartment: Option<Compartment>,
    /// `None` for centreline positions.
    pub side: Option<Side>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedReport {
    pub containers: Vec<Placement>,
    /// Only compartments that have a weight line in the report.
    pub weight_by_compartment: BTreeMap<Compartment, Real>,
    pub mac_zfw: Option<Real>,
    pub fuel_deviation_kg: Option<Real>,
    pub declared_container_count: Option<u32>,
}

impl ParsedReport {
    /// An empty placement list means the report could not be used.
    pub fn is_usable(&self) -> bool {
        !self.containers.is_empty()
    }
}

fn first_number(re: &Regex, text: &str) -> Option<Real> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn placements(text: &str) -> Vec<Placement> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut candidates: Vec<(usize, Placement)> = Vec::new();

    for re in PLACEMENT_EXTRACTORS {
        for caps in re.captures_iter(text) {
            let (Some(whole), Some(serial), Some(weight), Some(position)) =
                (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let Ok(weight_kg) = weight.as_str().parse::<Real>() else {
                continue;
            };
            let key = (serial.as_str().to_string(), position.as_str().to_string());
            if !seen.insert(key) {
                continue;
            }
            let position = position.as_str();
            candidates.push((
                whole.start(),
                Placement {
                    serial: serial.as_str().to_string(),
                    weight_kg,
                    position: position.to_string(),
                    compartment: compartment_of(position),
                    side: side_of(position),
                },
            ));
        }
    }

    candidates.sort_by_key(|(offset, _)| *offset);
    candidates.into_iter().map(|(_, p)| p).collect()
}

/// Parses report text. Never fails; unmatched facts are left absent.
pub fn parse_report(text: &str) -> ParsedReport {
    let mut weight_by_compartment = BTreeMap::new();
    for caps in COMPARTMENT_WEIGHT_RE.captures_iter(text) {
        let compartment = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .and_then(Compartment::from_number);
        let weight = caps.get(2).and_then(|m| m.as_str().parse::<Real>().ok());
        if let (Some(c), Some(w)) = (compartment, weight) {
            // First line per compartment wins.
            weight_by_compartment.entry(c).or_insert(w);
        }
    }

    let report = ParsedReport {
        containers: placements(text),
        weight_by_compartment,
        mac_zfw: first_number(&MAC_ZFW_RE, text),
        fuel_deviation_kg: first_number(&FUEL_DEVIATION_RE, text),
        declared_container_count: DECLARED_COUNT_RE
            .captures(text)
            .and_then(|c| c.get(1)?.as_str().parse().ok()),
    };
    tracing::debug!(
        containers = report.containers.len(),
        compartments = report.weight_by_compartment.len(),
        mac_zfw = ?report.mac_zfw,
        "parsed solver report"
    );
    report
}
