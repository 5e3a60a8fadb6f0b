//! Error types for the governance engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for governance operations
pub type Result<T> = std::result::Result<T, Error>;

/// Governance errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (operational switch, missing records, access gates)
    #[error("Ledger error: {0}")]
    Ledger(#[from] surety_ledger::Error),

    /// Business-rule precondition failed; no partial effect
    #[error("Rejected: {0}")]
    Rejected(RejectReason),

    /// Stake contribution below the minimum; rejected whole
    #[error("Underfunded: provided {provided}, required {required}")]
    Underfunded {
        /// Amount offered by the airline
        provided: Decimal,
        /// Minimum qualifying stake
        required: Decimal,
    },

    /// Withdrawal requested with a zero balance
    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Reason a business-rule precondition failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Proposer is not a funded, registered airline
    #[error("proposer is not a funded airline")]
    ProposerNotFunded,

    /// Airline is not registered
    #[error("airline is not registered")]
    AirlineNotRegistered,

    /// Airline has not provided funding
    #[error("airline is not funded")]
    AirlineNotFunded,

    /// No flight matches the requested airline and designator
    #[error("flight does not exist")]
    FlightMissing,

    /// Premium is zero, negative, or above the insurable cap
    #[error("premium is outside the insurable range")]
    PremiumOutOfRange,

    /// Passenger already holds a policy on this flight
    #[error("passenger already holds a policy on this flight")]
    DuplicatePolicy,
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
