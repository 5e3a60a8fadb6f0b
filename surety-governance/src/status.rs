//! Flight status transition policy
//!
//! Status ingestion is a two-step protocol: (1) record the reported
//! status (last write wins), (2) run the crediting sweep when the new
//! status qualifies. The trigger table below makes step 2 explicit
//! rather than burying it in control flow.

use surety_ledger::FlightStatus;

/// Whether a reported status triggers the crediting sweep
///
/// Every code except `ON_TIME` qualifies, including `UNKNOWN`. The
/// sweep itself is idempotent, so a spurious trigger credits nothing
/// twice.
pub fn triggers_credit(status: FlightStatus) -> bool {
    match status {
        FlightStatus::OnTime => false,
        FlightStatus::Unknown
        | FlightStatus::LateAirline
        | FlightStatus::LateWeather
        | FlightStatus::LateTechnical
        | FlightStatus::LateOther => true,
    }
}
