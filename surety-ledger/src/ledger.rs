//! Authoritative registry state behind a single transaction boundary
//!
//! The ledger holds raw records and enforces exactly two cross-cutting
//! guards: the operational switch on every mutation, and the owner check
//! on switch changes. Business policy (admission thresholds, payout
//! ratios, funding minimums) lives in the governance crate.
//!
//! Every method opens one scoped critical section on the state lock, so
//! no caller can observe a torn intermediate state and compound
//! mutations (vote-and-count, credit sweep, withdraw) commit atomically.

use crate::{
    types::{Address, Airline, Flight, FlightKey, FlightStatus, InsurancePolicy},
    Error, Result,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Registry state, owned exclusively by [`Ledger`]
#[derive(Debug, Default)]
struct LedgerState {
    /// Airline records keyed by identity
    airlines: HashMap<Address, Airline>,

    /// Votes accumulated by pending candidates; evicted on promotion
    pending_votes: HashMap<Address, HashSet<Address>>,

    /// Flight records keyed by the full composite key
    flights: HashMap<FlightKey, Flight>,

    /// Flight keys in registration order
    flight_order: Vec<FlightKey>,

    /// (airline, designator) route index; latest registration wins
    routes: HashMap<(Address, String), FlightKey>,

    /// Withdrawable passenger balances
    credits: HashMap<Address, Decimal>,

    /// Global kill switch; mutations fail closed when false
    operational: bool,
}

/// Authoritative in-memory ledger
#[derive(Debug)]
pub struct Ledger {
    /// Deploying identity; sole authority over the operational switch
    owner: Address,

    /// All registry state behind one lock
    state: RwLock<LedgerState>,
}

impl Ledger {
    /// Create a new ledger
    ///
    /// The founding airline is registered and funded at construction;
    /// the registry starts operational.
    pub fn new(owner: Address, founding_airline: Address) -> Self {
        let mut state = LedgerState {
            operational: true,
            ..Default::default()
        };

        let mut founder = Airline::pending(founding_airline.clone());
        founder.registered = true;
        founder.funded = true;
        state.airlines.insert(founding_airline, founder);

        Self {
            owner,
            state: RwLock::new(state),
        }
    }

    /// Owner identity fixed at construction
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    // ---------------------------------------------------------------
    // Operational switch
    // ---------------------------------------------------------------

    /// Whether the registry currently accepts mutations
    pub fn is_operational(&self) -> bool {
        self.state.read().operational
    }

    /// Flip the operational switch; owner only
    pub fn set_operational(&self, flag: bool, caller: &Address) -> Result<()> {
        if caller != &self.owner {
            return Err(Error::AccessDenied(caller.to_string()));
        }

        let mut state = self.state.write();
        state.operational = flag;
        tracing::info!(operational = flag, "Operational switch changed");
        Ok(())
    }

    /// Fail closed unless the switch is on
    fn require_operational(state: &LedgerState) -> Result<()> {
        if state.operational {
            Ok(())
        } else {
            Err(Error::NotOperational)
        }
    }

    // ---------------------------------------------------------------
    // Airline records
    // ---------------------------------------------------------------

    /// Create a pending airline record if absent
    pub fn upsert_airline(&self, address: &Address) -> Result<()> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        state
            .airlines
            .entry(address.clone())
            .or_insert_with(|| Airline::pending(address.clone()));
        Ok(())
    }

    /// Mark an airline registered, creating the record if absent
    ///
    /// Idempotent; registration is never revoked.
    pub fn mark_registered(&self, address: &Address) -> Result<()> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        state
            .airlines
            .entry(address.clone())
            .or_insert_with(|| Airline::pending(address.clone()))
            .registered = true;
        Ok(())
    }

    /// Mark an airline funded, creating the record if absent
    ///
    /// Idempotent; funding is never revoked.
    pub fn mark_funded(&self, address: &Address) -> Result<()> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        state
            .airlines
            .entry(address.clone())
            .or_insert_with(|| Airline::pending(address.clone()))
            .funded = true;
        Ok(())
    }

    /// Record a stake contribution; returns the new cumulative total
    pub fn add_stake(&self, address: &Address, amount: Decimal) -> Result<Decimal> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        let airline = state
            .airlines
            .entry(address.clone())
            .or_insert_with(|| Airline::pending(address.clone()));
        airline.total_stake += amount;
        Ok(airline.total_stake)
    }

    /// Airline record snapshot
    pub fn airline(&self, address: &Address) -> Option<Airline> {
        self.state.read().airlines.get(address).cloned()
    }

    /// Whether the airline is registered
    pub fn is_registered(&self, address: &Address) -> bool {
        self.state
            .read()
            .airlines
            .get(address)
            .map(|a| a.registered)
            .unwrap_or(false)
    }

    /// Whether the airline is funded
    pub fn is_funded(&self, address: &Address) -> bool {
        self.state
            .read()
            .airlines
            .get(address)
            .map(|a| a.funded)
            .unwrap_or(false)
    }

    /// Number of currently registered airlines
    pub fn registered_count(&self) -> usize {
        self.state
            .read()
            .airlines
            .values()
            .filter(|a| a.registered)
            .count()
    }

    // ---------------------------------------------------------------
    // Voting records
    // ---------------------------------------------------------------

    /// Record a vote for a pending candidate
    ///
    /// Duplicate votes from the same voter are absorbed. Returns the
    /// distinct-voter count after the insert, computed in the same
    /// critical section as the insert.
    pub fn cast_vote(&self, candidate: &Address, voter: &Address) -> Result<usize> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        let votes = state.pending_votes.entry(candidate.clone()).or_default();
        votes.insert(voter.clone());
        Ok(votes.len())
    }

    /// Distinct votes currently held by a pending candidate
    pub fn vote_count(&self, candidate: &Address) -> usize {
        self.state
            .read()
            .pending_votes
            .get(candidate)
            .map(|v| v.len())
            .unwrap_or(0)
    }

    /// Evict a candidate's vote set (on promotion)
    pub fn clear_votes(&self, candidate: &Address) -> Result<()> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        state.pending_votes.remove(candidate);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Flight records
    // ---------------------------------------------------------------

    /// Insert a flight record with status `Unknown`
    ///
    /// Returns `false` without touching state if the key already
    /// exists, keeping registration safe to retry.
    pub fn insert_flight(&self, key: FlightKey) -> Result<bool> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        if state.flights.contains_key(&key) {
            return Ok(false);
        }

        let route = (key.airline.clone(), key.designator.clone());
        state.routes.insert(route, key.clone());
        state.flight_order.push(key.clone());
        state.flights.insert(key.clone(), Flight::new(key));
        Ok(true)
    }

    /// Flight record snapshot by full key
    pub fn flight(&self, key: &FlightKey) -> Option<Flight> {
        self.state.read().flights.get(key).cloned()
    }

    /// Resolve a flight key by (airline, designator) route
    pub fn flight_key_by_route(&self, airline: &Address, designator: &str) -> Option<FlightKey> {
        self.state
            .read()
            .routes
            .get(&(airline.clone(), designator.to_string()))
            .cloned()
    }

    /// Flight record snapshot by (airline, designator) route
    pub fn flight_by_route(&self, airline: &Address, designator: &str) -> Option<Flight> {
        let state = self.state.read();
        let key = state.routes.get(&(airline.clone(), designator.to_string()))?;
        state.flights.get(key).cloned()
    }

    /// Overwrite a flight's status (last write wins)
    pub fn set_flight_status(&self, key: &FlightKey, status: FlightStatus) -> Result<()> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        let flight = state
            .flights
            .get_mut(key)
            .ok_or_else(|| Error::FlightNotFound(key.to_string()))?;
        flight.status = status;
        Ok(())
    }

    /// Flight designators in registration order
    pub fn flight_numbers(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .flight_order
            .iter()
            .map(|key| key.designator.clone())
            .collect()
    }

    /// Insured passengers on a route, in purchase order
    pub fn insurance_owners(&self, airline: &Address, designator: &str) -> Vec<Address> {
        let state = self.state.read();
        state
            .routes
            .get(&(airline.clone(), designator.to_string()))
            .and_then(|key| state.flights.get(key))
            .map(|flight| flight.insurees())
            .unwrap_or_default()
    }

    // ---------------------------------------------------------------
    // Insurance policies and passenger credit
    // ---------------------------------------------------------------

    /// Append a policy to a flight
    pub fn add_policy(&self, key: &FlightKey, policy: InsurancePolicy) -> Result<()> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        let flight = state
            .flights
            .get_mut(key)
            .ok_or_else(|| Error::FlightNotFound(key.to_string()))?;
        flight.policies.push(policy);
        Ok(())
    }

    /// Credit every uncredited policy on a flight
    ///
    /// Marks each uncredited policy credited and adds
    /// `premium * multiplier` to the holder's balance, all in one
    /// critical section. Already-credited policies are skipped, so
    /// re-running the sweep changes nothing. Returns the payouts made.
    pub fn credit_uncredited_policies(
        &self,
        key: &FlightKey,
        multiplier: Decimal,
    ) -> Result<Vec<(Address, Decimal)>> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        let flight = state
            .flights
            .get_mut(key)
            .ok_or_else(|| Error::FlightNotFound(key.to_string()))?;

        let mut payouts = Vec::new();
        for policy in flight.policies.iter_mut() {
            if policy.credited {
                continue;
            }
            policy.credited = true;
            payouts.push((policy.passenger.clone(), policy.premium * multiplier));
        }

        for (passenger, amount) in &payouts {
            *state.credits.entry(passenger.clone()).or_default() += *amount;
        }

        Ok(payouts)
    }

    /// Withdrawable balance of a passenger
    pub fn passenger_credit(&self, passenger: &Address) -> Decimal {
        self.state
            .read()
            .credits
            .get(passenger)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Zero a passenger's balance and return the withdrawn amount
    ///
    /// Read, zero, and return happen in one critical section; a second
    /// withdrawal can never observe the same nonzero balance. Returns
    /// zero if the passenger has no balance.
    pub fn take_credit(&self, passenger: &Address) -> Result<Decimal> {
        let mut state = self.state.write();
        Self::require_operational(&state)?;

        Ok(state.credits.remove(passenger).unwrap_or(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> Ledger {
        Ledger::new(Address::new("owner"), Address::new("airline-1"))
    }

    #[test]
    fn test_founding_airline_registered_and_funded() {
        let ledger = test_ledger();
        let founder = Address::new("airline-1");

        assert!(ledger.is_registered(&founder));
        assert!(ledger.is_funded(&founder));
        assert_eq!(ledger.registered_count(), 1);
    }

    #[test]
    fn test_switch_owner_only() {
        let ledger = test_ledger();

        let result = ledger.set_operational(false, &Address::new("intruder"));
        assert!(matches!(result, Err(Error::AccessDenied(_))));
        assert!(ledger.is_operational());

        ledger.set_operational(false, &Address::new("owner")).unwrap();
        assert!(!ledger.is_operational());
    }

    #[test]
    fn test_mutations_fail_closed_when_switched_off() {
        let ledger = test_ledger();
        ledger.set_operational(false, &Address::new("owner")).unwrap();

        let airline = Address::new("airline-2");
        assert!(matches!(
            ledger.mark_registered(&airline),
            Err(Error::NotOperational)
        ));
        assert!(matches!(
            ledger.insert_flight(FlightKey::new(airline.clone(), "ND1309", 0)),
            Err(Error::NotOperational)
        ));
        assert!(matches!(
            ledger.take_credit(&airline),
            Err(Error::NotOperational)
        ));

        // Reads are still served
        assert!(!ledger.is_registered(&airline));
        assert_eq!(ledger.flight_numbers().len(), 0);

        // Switch back on restores service
        ledger.set_operational(true, &Address::new("owner")).unwrap();
        ledger.mark_registered(&airline).unwrap();
        assert!(ledger.is_registered(&airline));
    }

    #[test]
    fn test_vote_deduplication() {
        let ledger = test_ledger();
        let candidate = Address::new("airline-5");
        let voter = Address::new("airline-2");

        assert_eq!(ledger.cast_vote(&candidate, &voter).unwrap(), 1);
        assert_eq!(ledger.cast_vote(&candidate, &voter).unwrap(), 1);
        assert_eq!(
            ledger.cast_vote(&candidate, &Address::new("airline-3")).unwrap(),
            2
        );

        ledger.clear_votes(&candidate).unwrap();
        assert_eq!(ledger.vote_count(&candidate), 0);
    }

    #[test]
    fn test_flight_insert_idempotent() {
        let ledger = test_ledger();
        let key = FlightKey::new(Address::new("airline-1"), "ND1309", 1_700_000_000);

        assert!(ledger.insert_flight(key.clone()).unwrap());
        assert!(!ledger.insert_flight(key.clone()).unwrap());
        assert_eq!(ledger.flight_numbers(), vec!["ND1309".to_string()]);
    }

    #[test]
    fn test_credit_sweep_idempotent() {
        let ledger = test_ledger();
        let airline = Address::new("airline-1");
        let passenger = Address::new("passenger-6");
        let key = FlightKey::new(airline, "ND1309", 1_700_000_000);

        ledger.insert_flight(key.clone()).unwrap();
        ledger
            .add_policy(&key, InsurancePolicy::new(passenger.clone(), Decimal::ONE))
            .unwrap();

        let multiplier = Decimal::new(15, 1);
        let payouts = ledger.credit_uncredited_policies(&key, multiplier).unwrap();
        assert_eq!(payouts.len(), 1);
        assert_eq!(ledger.passenger_credit(&passenger), Decimal::new(15, 1));

        // Second sweep with no new policies credits nothing
        let payouts = ledger.credit_uncredited_policies(&key, multiplier).unwrap();
        assert!(payouts.is_empty());
        assert_eq!(ledger.passenger_credit(&passenger), Decimal::new(15, 1));
    }

    #[test]
    fn test_take_credit_zeroes_balance() {
        let ledger = test_ledger();
        let airline = Address::new("airline-1");
        let passenger = Address::new("passenger-6");
        let key = FlightKey::new(airline, "ND1309", 1_700_000_000);

        ledger.insert_flight(key.clone()).unwrap();
        ledger
            .add_policy(&key, InsurancePolicy::new(passenger.clone(), Decimal::ONE))
            .unwrap();
        ledger
            .credit_uncredited_policies(&key, Decimal::new(15, 1))
            .unwrap();

        assert_eq!(ledger.take_credit(&passenger).unwrap(), Decimal::new(15, 1));
        assert_eq!(ledger.take_credit(&passenger).unwrap(), Decimal::ZERO);
        assert_eq!(ledger.passenger_credit(&passenger), Decimal::ZERO);
    }

    #[test]
    fn test_route_index_resolves_latest_registration() {
        let ledger = test_ledger();
        let airline = Address::new("airline-1");

        let first = FlightKey::new(airline.clone(), "ND1309", 100);
        let second = FlightKey::new(airline.clone(), "ND1309", 200);
        ledger.insert_flight(first).unwrap();
        ledger.insert_flight(second.clone()).unwrap();

        assert_eq!(ledger.flight_key_by_route(&airline, "ND1309"), Some(second));
    }
}
