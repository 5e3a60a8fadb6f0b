//! FlightSurety Ledger
//!
//! Authoritative in-memory registry for airlines, flights, insurance
//! policies, and passenger credit balances.
//!
//! # Architecture
//!
//! - **Single State Struct**: All records live in one state struct
//!   behind a single lock, so every operation commits atomically
//! - **Operational Switch**: An owner-controlled kill switch gates every
//!   mutation; reads are always served
//! - **No Policy**: Admission rules, payout ratios, and funding
//!   requirements belong to the governance layer above this crate
//!
//! # Invariants
//!
//! - Funds conservation: a passenger balance only grows via policy
//!   crediting and only shrinks by being zeroed on withdrawal
//! - A policy is credited at most once
//! - Flight keys and the owner identity are immutable once set
//! - Linearizable: mutations are serialized by the state lock

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod ledger;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use types::{Address, Airline, Flight, FlightKey, FlightStatus, InsurancePolicy};
