//! FlightSurety Governance Engine
//!
//! Business rules on top of the surety ledger: airline admission via
//! voting consensus, funding-requirement enforcement, flight
//! registration, status ingestion, insurance underwriting, and payout
//! settlement.
//!
//! # Architecture
//!
//! Every externally triggered action enters the engine, which validates
//! preconditions against ledger state, applies the rule, and issues the
//! ledger mutations. The ledger never calls back into the engine.
//!
//! 1. **Admission**: first four airlines admitted directly, then
//!    multi-signature voting with a strict-majority threshold
//! 2. **Funding**: a minimum stake unlocks participation, irreversibly
//! 3. **Status ingestion**: last write wins; qualifying statuses trigger
//!    the crediting sweep synchronously
//! 4. **Settlement**: passengers withdraw accrued credit atomically
//!
//! # Example
//!
//! ```
//! use surety_governance::{Config, GovernanceEngine};
//! use surety_ledger::Address;
//!
//! fn main() -> surety_governance::Result<()> {
//!     let engine = GovernanceEngine::new(
//!         Config::default(),
//!         Address::new("owner"),
//!         Address::new("airline-1"),
//!     );
//!
//!     let key = engine.register_flight(&Address::new("airline-1"), "ND1309", 1_700_000_000)?;
//!     println!("registered {key}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod admission;
pub mod config;
pub mod engine;
pub mod error;
pub mod status;
pub mod types;

// Re-exports
pub use config::Config;
pub use engine::GovernanceEngine;
pub use error::{Error, RejectReason, Result};
pub use types::{Admission, StatusQuery};
