//! End-to-end demo of the surety registry
//!
//! Drives a founding airline through flight registration, an insurance
//! purchase, a qualifying delay, and the passenger's withdrawal.

use rust_decimal::Decimal;
use std::error::Error;
use surety_governance::{Config, GovernanceEngine};
use surety_ledger::{Address, FlightStatus};

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting FlightSurety registry demo");

    let config = Config::default();
    let owner = Address::new("owner");
    let airline = Address::new("airline-1");
    let passenger = Address::new("passenger-6");

    let engine = GovernanceEngine::new(config, owner, airline.clone());

    let departure = 1_700_000_000;
    let key = engine.register_flight(&airline, "ND1309", departure)?;
    tracing::info!(flight = %key, "Flight registered");

    engine.buy(&passenger, &airline, "ND1309", Decimal::ONE)?;
    engine.update_flight_status(&airline, "ND1309", departure, FlightStatus::LateAirline)?;

    let credit = engine.get_passenger_credit(&passenger);
    tracing::info!(%credit, "Passenger credit after qualifying delay");

    let withdrawn = engine.withdraw(&passenger)?;
    tracing::info!(%withdrawn, "Passenger withdrawal settled");

    Ok(())
}
