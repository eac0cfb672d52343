//! ct-core: stable foundation for cargotrim.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - hold (compartments, sides, position-code conventions)
//! - flight (flight identity parsed from directory-style paths)
//! - error (shared error types)

pub mod error;
pub mod flight;
pub mod hold;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CtError, CtResult};
pub use flight::{FlightIdentity, FlightKey};
pub use hold::{Compartment, Side, compartment_of, side_of};
pub use numeric::*;
