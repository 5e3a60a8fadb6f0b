//! Error types for the ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Operational switch is off; all mutations fail closed
    #[error("Registry is not operational")]
    NotOperational,

    /// Caller lacks the required authority (owner-only gate)
    #[error("Access denied for caller: {0}")]
    AccessDenied(String),

    /// Airline record not found
    #[error("Airline not found: {0}")]
    AirlineNotFound(String),

    /// Flight record not found
    #[error("Flight not found: {0}")]
    FlightNotFound(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
