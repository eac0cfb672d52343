//! Fuel-efficiency bracket curves.
//!
//! Each curve maps a zero-fuel-weight MAC percentage to a fuel-burn
//! increment (percent of trip fuel) through piecewise-linear segments.
//! Three aircraft families carry their own curve; every other type falls
//! back to the 787 curve, which is an approximation for those types and not
//! a measured curve.

use std::fmt;

use ct_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{AircraftError, AircraftResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftFamily {
    B787,
    B772,
    B77W,
    /// Types without a dedicated curve.
    Default,
}

impl AircraftFamily {
    pub const ALL: [AircraftFamily; 4] = [
        AircraftFamily::B787,
        AircraftFamily::B772,
        AircraftFamily::B77W,
        AircraftFamily::Default,
    ];

    /// Family of an aircraft type code, by substring match in the order
    /// 787, 772, 77W.
    pub fn from_type(ac_type: &str) -> Self {
        let code = ac_type.to_ascii_uppercase();
        if code.contains("787") {
            AircraftFamily::B787
        } else if code.contains("772") {
            AircraftFamily::B772
        } else if code.contains("77W") {
            AircraftFamily::B77W
        } else {
            AircraftFamily::Default
        }
    }

    fn slot(self) -> usize {
        match self {
            AircraftFamily::B787 => 0,
            AircraftFamily::B772 => 1,
            AircraftFamily::B77W => 2,
            AircraftFamily::Default => 3,
        }
    }
}

impl fmt::Display for AircraftFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AircraftFamily::B787 => "787",
            AircraftFamily::B772 => "772",
            AircraftFamily::B77W => "77W",
            AircraftFamily::Default => "default",
        };
        f.write_str(s)
    }
}

const CURVE_787: [(Real, Real); 13] = [
    (0.0, 2.2),
    (16.0, 2.2),
    (18.0, 2.0),
    (20.0, 1.6),
    (22.0, 1.3),
    (24.0, 1.0),
    (26.0, 0.6),
    (28.0, 0.4),
    (32.0, 0.0),
    (34.0, -0.3),
    (36.0, -0.4),
    (40.0, -0.5),
    (43.0, -0.5),
];

const CURVE_772: [(Real, Real); 13] = [
    (0.0, 1.3),
    (16.0, 1.3),
    (18.0, 1.3),
    (20.0, 1.2),
    (22.0, 0.9),
    (24.0, 0.6),
    (26.0, 0.4),
    (28.0, 0.2),
    (32.0, 0.0),
    (34.0, -0.4),
    (36.0, -0.5),
    (40.0, -0.7),
    (43.0, -0.7),
];

const CURVE_77W: [(Real, Real); 13] = [
    (0.0, 1.7),
    (16.0, 1.7),
    (18.0, 1.5),
    (20.0, 1.2),
    (22.0, 0.9),
    (24.0, 0.6),
    (26.0, 0.4),
    (28.0, 0.2),
    (32.0, 0.0),
    (34.0, -0.4),
    (36.0, -0.5),
    (40.0, -0.6),
    (43.0, -0.6),
];

/// One piecewise-linear curve, points ordered by MAC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelBracketSet {
    points: Vec<(Real, Real)>,
}

impl FuelBracketSet {
    /// Builds a curve from `(mac_percent, increment)` points.
    ///
    /// Points must be finite and non-decreasing in MAC, and there must be at
    /// least two of them.
    pub fn new(points: Vec<(Real, Real)>, what: &str) -> AircraftResult<Self> {
        let ordered = points.len() >= 2
            && points.iter().all(|(x, y)| x.is_finite() && y.is_finite())
            && points.windows(2).all(|w| w[0].0 <= w[1].0);
        if !ordered {
            return Err(AircraftError::UnorderedBrackets {
                what: what.to_string(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[(Real, Real)] {
        &self.points
    }

    /// MAC range covered by the curve.
    pub fn range(&self) -> (Real, Real) {
        // `new` guarantees at least two points.
        (self.points[0].0, self.points[self.points.len() - 1].0)
    }

    /// Interpolated increment at `mac`, or `None` outside every segment.
    ///
    /// Segments are closed on both ends and the first matching segment wins,
    /// so a value on a shared breakpoint takes the left segment's end value.
    pub fn increment_at(&self, mac: Real) -> Option<Real> {
        if !mac.is_finite() {
            return None;
        }
        self.points.windows(2).find_map(|w| {
            let ((x1, y1), (x2, y2)) = (w[0], w[1]);
            if !(x1 <= mac && mac <= x2) {
                return None;
            }
            if x2 == x1 {
                return Some(y1);
            }
            Some(y1 + (mac - x1) * (y2 - y1) / (x2 - x1))
        })
    }
}

/// Curves for every family. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketCatalog {
    curves: [FuelBracketSet; 4],
}

impl BracketCatalog {
    pub fn standard() -> Self {
        let curve = |points: &[(Real, Real)]| FuelBracketSet {
            points: points.to_vec(),
        };
        Self {
            curves: [
                curve(&CURVE_787),
                curve(&CURVE_772),
                curve(&CURVE_77W),
                curve(&CURVE_787),
            ],
        }
    }

    pub fn with_curve(mut self, family: AircraftFamily, curve: FuelBracketSet) -> Self {
        self.curves[family.slot()] = curve;
        self
    }

    pub fn curve(&self, family: AircraftFamily) -> &FuelBracketSet {
        &self.curves[family.slot()]
    }

    pub fn for_aircraft(&self, ac_type: &str) -> (AircraftFamily, &FuelBracketSet) {
        let family = AircraftFamily::from_type(ac_type);
        (family, self.curve(family))
    }
}

impl Default for BracketCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
