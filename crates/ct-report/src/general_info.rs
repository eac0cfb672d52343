//! `General_Information.txt`: flight facts the solver wrote next to its report.

use std::sync::LazyLock;

use ct_core::Real;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FLIGHT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Flight Number: ([A-Z]{2}\d+)").expect("flight number pattern is valid")
});
static AIRCRAFT_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Aircraft Type: (\w+)").expect("aircraft type pattern is valid"));
static ZFW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ZFW: (\d+(?:\.\d+)?) kg").expect("ZFW pattern is valid"));
static TOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"TOW: (\d+(?:\.\d+)?) kg").expect("TOW pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub flight_number: Option<String>,
    pub aircraft_type: Option<String>,
    pub zfw_kg: Option<Real>,
    pub tow_kg: Option<Real>,
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)?.get(1).map(|m| m.as_str())
}

pub fn parse_general_info(text: &str) -> GeneralInfo {
    GeneralInfo {
        flight_number: capture(&FLIGHT_NUMBER_RE, text).map(str::to_string),
        aircraft_type: capture(&AIRCRAFT_TYPE_RE, text).map(str::to_string),
        zfw_kg: capture(&ZFW_RE, text).and_then(|v| v.parse().ok()),
        tow_kg: capture(&TOW_RE, text).and_then(|v| v.parse().ok()),
    }
}
