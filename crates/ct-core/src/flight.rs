//! Flight identity parsed from the directory-style flight path.
//!
//! Paths have the fixed shape `"<route-folder>/<flight-folder>"`, for example
//! `"Flights AMSSIN JAN 2024/Flight KL0835 AMSSIN 01 JAN 2024"`.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::CtError;

static FLIGHT_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{2})(\d{1,6})\b").expect("flight key pattern is valid")
});

const ROUTE_FOLDER_PREFIX: &str = "Flights ";

/// Carrier code plus numeric flight number.
///
/// The number is stored as an integer so `KL835` and `KL0835` compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightKey {
    pub carrier: String,
    pub number: u32,
}

impl FlightKey {
    pub fn new(carrier: impl Into<String>, number: u32) -> Self {
        Self {
            carrier: carrier.into(),
            number,
        }
    }

    /// First flight designator (`KL0835`) found in `text`.
    pub fn find(text: &str) -> Option<Self> {
        let caps = FLIGHT_KEY_RE.captures(text)?;
        let number = caps.get(2)?.as_str().parse().ok()?;
        Some(Self::new(caps.get(1)?.as_str(), number))
    }

    /// Designator zero-padded to four digits, the way flight folders are named.
    pub fn padded(&self) -> String {
        format!("{}{:04}", self.carrier, self.number)
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.carrier, self.number)
    }
}

/// Route, flight number and date of one flight, plus the path they came from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightIdentity {
    pub path: String,
    pub route_folder: String,
    pub flight_folder: String,
    /// Route plus month token, e.g. `AMSSIN JAN 2024`.
    pub route_token: String,
    pub route: String,
    pub flight: FlightKey,
    pub date: Option<String>,
}

impl FlightIdentity {
    pub fn parse(path: &str) -> Result<Self, CtError> {
        let malformed = |reason| CtError::MalformedFlightPath {
            path: path.to_string(),
            reason,
        };

        let segments: Vec<&str> = path
            .split(['/', '\\'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let [route_folder, flight_folder] = segments.as_slice() else {
            return Err(malformed("expected '<route-folder>/<flight-folder>'"));
        };

        let route_token = route_folder
            .strip_prefix(ROUTE_FOLDER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| malformed("route folder must start with 'Flights '"))?;
        let route = route_token
            .split_whitespace()
            .next()
            .ok_or_else(|| malformed("route folder has no route"))?;

        let flight = FlightKey::find(flight_folder)
            .ok_or_else(|| malformed("flight folder has no flight number"))?;

        Ok(Self {
            path: path.to_string(),
            route_folder: route_folder.to_string(),
            flight_folder: flight_folder.to_string(),
            route_token: route_token.to_string(),
            route: route.to_string(),
            date: date_after_designator(flight_folder, route),
            flight,
        })
    }
}

impl fmt::Display for FlightIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.flight, self.route, self.route_token)
    }
}

fn date_after_designator(flight_folder: &str, route: &str) -> Option<String> {
    let tokens: Vec<&str> = flight_folder.split_whitespace().collect();
    let designator = tokens
        .iter()
        .position(|t| FlightKey::find(t).is_some())?;
    let mut rest = &tokens[designator + 1..];
    if rest.first() == Some(&route) {
        rest = &rest[1..];
    }
    if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn leading_zeros_do_not_change_flight_key(n in 0_u32..10_000, pad in 4_usize..7) {
            let plain = FlightKey::find(&format!("Flight KL{n} AMSSIN 01 JAN 24"));
            let padded = FlightKey::find(&format!("Flight KL{n:0pad$} AMSSIN 01 JAN 2024"));
            prop_assert!(plain.is_some());
            prop_assert_eq!(plain, padded);
        }
    }
}
