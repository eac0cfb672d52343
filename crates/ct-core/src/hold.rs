//! Cargo hold geometry conventions.
//!
//! A position code such as `11L` or `42R` encodes its compartment in the first
//! character (`1`..`4`) and its side by the presence of `L` or `R`. Codes with
//! neither letter are centreline positions.

use core::fmt;
use core::str::FromStr;

use crate::CtError;

/// One of the four lower-deck cargo compartments, front to back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compartment {
    C1,
    C2,
    C3,
    C4,
}

impl Compartment {
    pub const ALL: [Compartment; 4] = [
        Compartment::C1,
        Compartment::C2,
        Compartment::C3,
        Compartment::C4,
    ];

    /// Compartment for a 1-based index, as written in solver reports.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::C1),
            2 => Some(Self::C2),
            3 => Some(Self::C3),
            4 => Some(Self::C4),
            _ => None,
        }
    }

    /// 0-based slot, handy for fixed-size coefficient arrays.
    pub fn slot(self) -> usize {
        match self {
            Self::C1 => 0,
            Self::C2 => 1,
            Self::C3 => 2,
            Self::C4 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::C3 => "C3",
            Self::C4 => "C4",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compartment {
    type Err = CtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            "C3" => Ok(Self::C3),
            "C4" => Ok(Self::C4),
            _ => Err(CtError::UnknownCompartment {
                code: s.to_string(),
            }),
        }
    }
}

/// Lateral side of the hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compartment encoded by the first character of a position code.
pub fn compartment_of(position: &str) -> Option<Compartment> {
    let first = position.trim().chars().next()?;
    Compartment::from_number(first.to_digit(10)?)
}

/// Side encoded in a position code; `None` for centreline positions.
pub fn side_of(position: &str) -> Option<Side> {
    let upper = position.to_ascii_uppercase();
    if upper.contains('L') {
        Some(Side::Left)
    } else if upper.contains('R') {
        Some(Side::Right)
    } else {
        None
    }
}
