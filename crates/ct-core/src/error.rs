use thiserror::Error;

pub type CtResult<T> = Result<T, CtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CtError {
    #[error("Malformed flight path '{path}': {reason}")]
    MalformedFlightPath { path: String, reason: &'static str },

    #[error("Unknown compartment code: {code}")]
    UnknownCompartment { code: String },
}
