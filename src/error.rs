//! Error types for the ACO-CVRP solver.

use std::fmt;
use std::io;

/// Errors surfaced to callers of the solver.
#[derive(Debug)]
pub enum AcoError {
    /// A configuration parameter is out of range.
    InvalidConfig(String),
    /// The problem instance is malformed or cannot be served by any fleet.
    InvalidInstance(String),
    /// Fleet escalation went past one vehicle per customer without success.
    FleetExhausted { vehicles: usize },
    /// Reading or writing a file failed.
    Io(io::Error),
    /// A JSON document could not be parsed or written.
    Json(serde_json::Error),
}

/// A type alias for results produced by this crate.
pub type AcoResult<T> = Result<T, AcoError>;

impl fmt::Display for AcoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcoError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            AcoError::InvalidInstance(msg) => write!(f, "invalid instance: {}", msg),
            AcoError::FleetExhausted { vehicles } => write!(
                f,
                "no feasible construction found with up to {} vehicles",
                vehicles
            ),
            AcoError::Io(err) => write!(f, "i/o error: {}", err),
            AcoError::Json(err) => write!(f, "json error: {}", err),
        }
    }
}

impl std::error::Error for AcoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AcoError::Io(err) => Some(err),
            AcoError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for AcoError {
    fn from(err: io::Error) -> Self {
        AcoError::Io(err)
    }
}

impl From<serde_json::Error> for AcoError {
    fn from(err: serde_json::Error) -> Self {
        AcoError::Json(err)
    }
}
