//! Core types for the governance engine

use serde::{Deserialize, Serialize};
use surety_ledger::{Address, FlightStatus};

/// Outcome of an airline registration request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Admission {
    /// Candidate is registered
    Admitted,
    /// Candidate awaits further votes
    Pending {
        /// Distinct votes accumulated so far
        votes: usize,
        /// Distinct votes required for admission
        required: usize,
    },
}

impl Admission {
    /// Whether the candidate is registered after this request
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Response to a flight status query (log-style tuple)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    /// Operating airline
    pub airline: Address,

    /// Flight designator
    pub designator: String,

    /// Departure timestamp echoed from the request
    pub timestamp: i64,

    /// Last recorded status
    pub status: FlightStatus,
}
