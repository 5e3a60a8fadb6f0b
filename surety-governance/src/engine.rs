//! Main governance engine
//!
//! Validates preconditions against ledger state, applies the admission,
//! funding, and insurance rules, and issues the ledger mutations.
//!
//! Mutating operations are serialized by a single write gate, so every
//! check-then-act sequence (vote tally then admission, balance read then
//! zeroing) executes as one critical section. Reads bypass the gate and
//! observe the ledger's consistent snapshots.

use crate::{
    admission,
    config::Config,
    status,
    types::{Admission, StatusQuery},
    Error, RejectReason, Result,
};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::sync::Arc;
use surety_ledger::{Address, FlightKey, FlightStatus, InsurancePolicy, Ledger};

/// Governance engine
pub struct GovernanceEngine {
    /// Authoritative state
    ledger: Arc<Ledger>,

    /// Policy configuration
    config: Config,

    /// Serializes mutating operations (single-writer contract)
    write_gate: Mutex<()>,
}

impl std::fmt::Debug for GovernanceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GovernanceEngine {
    /// Create a new engine with a fresh ledger
    ///
    /// The founding airline is registered and funded by construction.
    pub fn new(config: Config, owner: Address, founding_airline: Address) -> Self {
        let ledger = Arc::new(Ledger::new(owner, founding_airline));
        Self {
            ledger,
            config,
            write_gate: Mutex::new(()),
        }
    }

    /// Shared handle to the underlying ledger
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    // ---------------------------------------------------------------
    // Operational switch
    // ---------------------------------------------------------------

    /// Whether the registry currently accepts mutations
    pub fn is_operational(&self) -> bool {
        self.ledger.is_operational()
    }

    /// Flip the operational switch; owner only
    ///
    /// Serialized behind the write gate like every other mutation, so a
    /// flip cannot land in the middle of a multi-step sequence such as
    /// an admission and leave it half-applied.
    pub fn set_operating_status(&self, flag: bool, caller: &Address) -> Result<()> {
        let _gate = self.write_gate.lock();

        self.ledger.set_operational(flag, caller)?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Airline admission
    // ---------------------------------------------------------------

    /// Propose an airline for admission
    ///
    /// Inside the founding cohort the candidate is admitted directly.
    /// Afterwards the proposal counts as one vote; admission requires a
    /// strict majority of the airlines registered before this call.
    /// Re-proposing a registered airline and duplicate votes are safe
    /// no-ops.
    pub fn register_airline(&self, proposer: &Address, candidate: &Address) -> Result<Admission> {
        let _gate = self.write_gate.lock();

        let eligible = self
            .ledger
            .airline(proposer)
            .map(|a| a.is_participant())
            .unwrap_or(false);
        if !eligible {
            return Err(Error::Rejected(RejectReason::ProposerNotFunded));
        }

        if self.ledger.is_registered(candidate) {
            return Ok(Admission::Admitted);
        }

        let registered = self.ledger.registered_count();
        if admission::direct_admission(registered, self.config.policy.founding_cohort_size) {
            self.ledger.mark_registered(candidate)?;
            tracing::info!(airline = %candidate, "Airline admitted directly");
            return Ok(Admission::Admitted);
        }

        self.ledger.upsert_airline(candidate)?;
        let votes = self.ledger.cast_vote(candidate, proposer)?;
        let required = admission::votes_required(registered);

        if votes >= required {
            self.ledger.mark_registered(candidate)?;
            self.ledger.clear_votes(candidate)?;
            tracing::info!(airline = %candidate, votes, "Airline admitted by consensus");
            Ok(Admission::Admitted)
        } else {
            tracing::info!(airline = %candidate, votes, required, "Airline pending consensus");
            Ok(Admission::Pending { votes, required })
        }
    }

    /// Accept a stake contribution from an airline
    ///
    /// A contribution below the minimum stake while the airline is not
    /// yet funded is rejected whole. A qualifying contribution is
    /// retained in full, including any overpayment, and marks the
    /// airline funded irreversibly.
    pub fn fund(&self, airline: &Address, amount: Decimal) -> Result<()> {
        let _gate = self.write_gate.lock();

        let required = self.config.policy.min_airline_stake;
        let already_funded = self.ledger.is_funded(airline);
        if amount <= Decimal::ZERO || (!already_funded && amount < required) {
            return Err(Error::Underfunded {
                provided: amount,
                required,
            });
        }

        let total = self.ledger.add_stake(airline, amount)?;
        if !already_funded {
            self.ledger.mark_funded(airline)?;
            tracing::info!(airline = %airline, %total, "Airline funded");
        }
        Ok(())
    }

    /// Whether the airline is registered
    pub fn is_registered(&self, airline: &Address) -> bool {
        self.ledger.is_registered(airline)
    }

    /// Whether the airline is funded
    pub fn is_funded(&self, airline: &Address) -> bool {
        self.ledger.is_funded(airline)
    }

    // ---------------------------------------------------------------
    // Flights and status
    // ---------------------------------------------------------------

    /// Register a flight for a funded, registered airline
    ///
    /// Registering the same key twice is a no-op returning the existing
    /// key.
    pub fn register_flight(
        &self,
        airline: &Address,
        designator: &str,
        timestamp: i64,
    ) -> Result<FlightKey> {
        let _gate = self.write_gate.lock();

        let record = self.ledger.airline(airline);
        match record {
            Some(ref a) if !a.registered => {
                return Err(Error::Rejected(RejectReason::AirlineNotRegistered))
            }
            Some(ref a) if !a.funded => {
                return Err(Error::Rejected(RejectReason::AirlineNotFunded))
            }
            None => return Err(Error::Rejected(RejectReason::AirlineNotRegistered)),
            Some(_) => {}
        }

        let key = FlightKey::new(airline.clone(), designator, timestamp);
        if self.ledger.insert_flight(key.clone())? {
            tracing::info!(flight = %key, "Flight registered");
        }
        Ok(key)
    }

    /// Read the last recorded status of a flight
    pub fn fetch_flight_status(
        &self,
        airline: &Address,
        designator: &str,
        timestamp: i64,
    ) -> Result<StatusQuery> {
        let flight = self
            .ledger
            .flight_by_route(airline, designator)
            .ok_or(Error::Rejected(RejectReason::FlightMissing))?;

        Ok(StatusQuery {
            airline: airline.clone(),
            designator: designator.to_string(),
            timestamp,
            status: flight.status,
        })
    }

    /// Ingest a reported flight status
    ///
    /// Last write wins. A status that qualifies per the trigger table
    /// runs the crediting sweep synchronously for all insured
    /// passengers on the flight.
    pub fn update_flight_status(
        &self,
        airline: &Address,
        designator: &str,
        timestamp: i64,
        new_status: FlightStatus,
    ) -> Result<()> {
        let _gate = self.write_gate.lock();

        let key = self
            .ledger
            .flight_key_by_route(airline, designator)
            .ok_or(Error::Rejected(RejectReason::FlightMissing))?;

        self.ledger.set_flight_status(&key, new_status)?;
        tracing::info!(flight = %key, status = %new_status, reported_at = timestamp, "Flight status updated");

        if status::triggers_credit(new_status) {
            self.run_credit_sweep(&key)?;
        }
        Ok(())
    }

    /// Numeric wire code for a symbolic status name
    pub fn status_code(&self, name: &str) -> Option<u8> {
        FlightStatus::from_name(name).map(|s| s.code())
    }

    /// Flight designators in registration order
    pub fn flight_numbers(&self) -> Vec<String> {
        self.ledger.flight_numbers()
    }

    // ---------------------------------------------------------------
    // Insurance and payout
    // ---------------------------------------------------------------

    /// Buy insurance on a flight
    ///
    /// The premium must be positive and within the insurable cap; a
    /// passenger holds at most one policy per flight.
    pub fn buy(
        &self,
        passenger: &Address,
        airline: &Address,
        designator: &str,
        value: Decimal,
    ) -> Result<()> {
        let _gate = self.write_gate.lock();

        let flight = self
            .ledger
            .flight_by_route(airline, designator)
            .ok_or(Error::Rejected(RejectReason::FlightMissing))?;

        if value <= Decimal::ZERO || value > self.config.policy.max_insurance_premium {
            return Err(Error::Rejected(RejectReason::PremiumOutOfRange));
        }

        if flight.has_policy(passenger) {
            return Err(Error::Rejected(RejectReason::DuplicatePolicy));
        }

        self.ledger
            .add_policy(&flight.key, InsurancePolicy::new(passenger.clone(), value))?;
        tracing::info!(flight = %flight.key, passenger = %passenger, premium = %value, "Policy purchased");
        Ok(())
    }

    /// Credit every uncredited policy on a flight
    ///
    /// Idempotent; an unknown flight is a logged no-op.
    pub fn credit_insurees(&self, airline: &Address, designator: &str, timestamp: i64) -> Result<()> {
        let _gate = self.write_gate.lock();

        match self.ledger.flight_key_by_route(airline, designator) {
            Some(key) => self.run_credit_sweep(&key),
            None => {
                tracing::warn!(
                    airline = %airline,
                    designator,
                    timestamp,
                    "Credit sweep requested for unknown flight"
                );
                Ok(())
            }
        }
    }

    /// Credit all uncredited policies on a flight; caller holds the gate
    fn run_credit_sweep(&self, key: &FlightKey) -> Result<()> {
        let multiplier = self.config.policy.payout_multiplier;
        let payouts = self.ledger.credit_uncredited_policies(key, multiplier)?;

        for (passenger, amount) in &payouts {
            tracing::info!(flight = %key, passenger = %passenger, %amount, "Insurance payout credited");
        }
        Ok(())
    }

    /// Withdraw a passenger's full credit balance
    ///
    /// Zeroes the balance and returns the amount atomically.
    pub fn withdraw(&self, caller: &Address) -> Result<Decimal> {
        let _gate = self.write_gate.lock();

        let amount = self.ledger.take_credit(caller)?;
        if amount.is_zero() {
            return Err(Error::NothingToWithdraw);
        }

        tracing::info!(passenger = %caller, %amount, "Credit withdrawn");
        Ok(amount)
    }

    /// Withdrawable balance of a passenger
    pub fn get_passenger_credit(&self, passenger: &Address) -> Decimal {
        self.ledger.passenger_credit(passenger)
    }

    /// Insured passengers on a route, in purchase order
    pub fn insurance_owners(&self, airline: &Address, designator: &str) -> Vec<Address> {
        self.ledger.insurance_owners(airline, designator)
    }
}
