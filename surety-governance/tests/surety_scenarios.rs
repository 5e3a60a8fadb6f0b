//! Integration scenarios for the surety registry
//!
//! Exercises the full operation surface the way an external caller
//! (UI or reporting feed) would: discrete synchronous requests against
//! the governance engine, reading results back through the ledger.

use proptest::prelude::*;
use rust_decimal::Decimal;
use surety_governance::{Admission, Config, Error, GovernanceEngine, RejectReason};
use surety_ledger::{Address, FlightStatus};

fn addr(id: &str) -> Address {
    Address::new(id)
}

fn test_engine() -> GovernanceEngine {
    GovernanceEngine::new(Config::default(), addr("owner"), addr("airline-1"))
}

#[test]
fn end_to_end_insurance_lifecycle() {
    let engine = test_engine();
    let airline = addr("airline-1");
    let passenger = addr("passenger-6");
    let departure = 1_700_000_000;

    // Founding airline is registered and funded by construction
    assert!(engine.is_registered(&airline));
    assert!(engine.is_funded(&airline));

    // Register flight and buy insurance for 1 unit
    let key = engine.register_flight(&airline, "ND1309", departure).unwrap();
    assert_eq!(key.designator, "ND1309");
    engine.buy(&passenger, &airline, "ND1309", Decimal::ONE).unwrap();
    assert_eq!(
        engine.insurance_owners(&airline, "ND1309"),
        vec![passenger.clone()]
    );

    // Airline-caused delay credits 1.5 units
    engine
        .update_flight_status(&airline, "ND1309", departure, FlightStatus::LateAirline)
        .unwrap();
    assert_eq!(engine.get_passenger_credit(&passenger), Decimal::new(15, 1));

    // Withdrawal settles the full balance exactly once
    assert_eq!(engine.withdraw(&passenger).unwrap(), Decimal::new(15, 1));
    assert_eq!(engine.get_passenger_credit(&passenger), Decimal::ZERO);
    assert!(matches!(
        engine.withdraw(&passenger),
        Err(Error::NothingToWithdraw)
    ));
}

#[test]
fn admission_walkthrough_from_founding_to_consensus() {
    let engine = test_engine();
    let founder = addr("airline-1");

    // Second airline admitted directly, but cannot propose until funded
    engine.register_airline(&founder, &addr("airline-2")).unwrap();
    assert!(matches!(
        engine.register_airline(&addr("airline-2"), &addr("airline-3")),
        Err(Error::Rejected(RejectReason::ProposerNotFunded))
    ));

    // After funding, the second airline can propose the third
    engine.fund(&addr("airline-2"), Decimal::from(10)).unwrap();
    let admitted = engine
        .register_airline(&addr("airline-2"), &addr("airline-3"))
        .unwrap();
    assert!(admitted.is_admitted());

    // Fourth completes the founding cohort; fifth needs consensus
    engine.register_airline(&founder, &addr("airline-4")).unwrap();
    let pending = engine.register_airline(&founder, &addr("airline-5")).unwrap();
    assert_eq!(pending, Admission::Pending { votes: 1, required: 3 });
    assert!(!engine.is_registered(&addr("airline-5")));

    engine.fund(&addr("airline-3"), Decimal::from(10)).unwrap();
    let pending = engine
        .register_airline(&addr("airline-2"), &addr("airline-5"))
        .unwrap();
    assert_eq!(pending, Admission::Pending { votes: 2, required: 3 });

    let admitted = engine
        .register_airline(&addr("airline-3"), &addr("airline-5"))
        .unwrap();
    assert_eq!(admitted, Admission::Admitted);
    assert!(engine.is_registered(&addr("airline-5")));
}

#[test]
fn flight_numbers_preserve_registration_order() {
    let engine = test_engine();
    let airline = addr("airline-1");

    engine.register_flight(&airline, "ND1309", 100).unwrap();
    engine.register_flight(&airline, "ND1309a", 200).unwrap();
    engine.register_flight(&airline, "ND1309b", 300).unwrap();

    // Duplicate registration leaves exactly one record
    engine.register_flight(&airline, "ND1309", 100).unwrap();

    assert_eq!(
        engine.flight_numbers(),
        vec!["ND1309", "ND1309a", "ND1309b"]
    );
}

#[test]
fn status_updates_are_last_write_wins() {
    let engine = test_engine();
    let airline = addr("airline-1");
    let departure = 1_700_000_000;

    engine.register_flight(&airline, "ND1309", departure).unwrap();

    for name in [
        "UNKNOWN",
        "ON_TIME",
        "LATE_AIRLINE",
        "LATE_WEATHER",
        "LATE_TECHNICAL",
        "LATE_OTHER",
    ] {
        let code = engine.status_code(name).unwrap();
        let status = FlightStatus::from_code(code).unwrap();
        engine
            .update_flight_status(&airline, "ND1309", departure, status)
            .unwrap();

        let query = engine.fetch_flight_status(&airline, "ND1309", departure).unwrap();
        assert_eq!(query.status, status);
        assert_eq!(query.designator, "ND1309");
        assert_eq!(query.timestamp, departure);
    }
}

#[test]
fn funding_is_monotonic_across_operations() {
    let engine = test_engine();
    engine.register_airline(&addr("airline-1"), &addr("airline-2")).unwrap();
    engine.fund(&addr("airline-2"), Decimal::from(10)).unwrap();
    assert!(engine.is_funded(&addr("airline-2")));

    // Subsequent activity never revokes funding
    engine.register_flight(&addr("airline-2"), "XB42", 500).unwrap();
    engine.register_airline(&addr("airline-2"), &addr("airline-3")).unwrap();
    engine
        .update_flight_status(&addr("airline-2"), "XB42", 500, FlightStatus::OnTime)
        .unwrap();
    assert!(engine.is_funded(&addr("airline-2")));
}

#[test]
fn operational_switch_gates_the_whole_surface() {
    let engine = test_engine();
    let airline = addr("airline-1");
    let passenger = addr("passenger-6");

    engine.register_flight(&airline, "ND1309", 100).unwrap();
    engine.buy(&passenger, &airline, "ND1309", Decimal::ONE).unwrap();
    engine.set_operating_status(false, &addr("owner")).unwrap();

    assert!(engine.fund(&addr("airline-1"), Decimal::from(10)).is_err());
    assert!(engine
        .update_flight_status(&airline, "ND1309", 100, FlightStatus::LateAirline)
        .is_err());
    assert!(engine.credit_insurees(&airline, "ND1309", 100).is_err());
    assert!(engine.withdraw(&passenger).is_err());

    // Reads stay available while switched off
    assert!(!engine.is_operational());
    assert_eq!(engine.flight_numbers(), vec!["ND1309"]);
    assert_eq!(engine.get_passenger_credit(&passenger), Decimal::ZERO);
}

#[test]
fn switch_flips_cannot_tear_admission_sequences() {
    use std::sync::Arc;
    use std::thread;

    let engine = Arc::new(test_engine());
    let founder = addr("airline-1");

    // Founding cohort; airline-4 stays unfunded so consensus is always
    // the multi-call path
    for id in ["airline-2", "airline-3", "airline-4"] {
        engine.register_airline(&founder, &addr(id)).unwrap();
    }
    engine.fund(&addr("airline-2"), Decimal::from(10)).unwrap();
    engine.fund(&addr("airline-3"), Decimal::from(10)).unwrap();

    // Owner flips the kill switch while admissions are in flight;
    // the switch must serialize with them, never land mid-sequence
    let toggler = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..50 {
                engine.set_operating_status(false, &addr("owner")).unwrap();
                engine.set_operating_status(true, &addr("owner")).unwrap();
            }
        })
    };

    let mut voters = vec![addr("airline-1"), addr("airline-2"), addr("airline-3")];
    for idx in 0..10 {
        let candidate = addr(&format!("airline-c{idx}"));

        let mut admitted = false;
        while !admitted {
            for voter in &voters {
                match engine.register_airline(voter, &candidate) {
                    Ok(admission) => admitted = admission.is_admitted(),
                    // A switch-off rejects the whole call, no partial effect
                    Err(Error::Ledger(surety_ledger::Error::NotOperational)) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
                if admitted {
                    break;
                }
            }
        }

        // An admitted candidate never retains a stale vote set
        assert!(engine.is_registered(&candidate));
        assert_eq!(engine.ledger().vote_count(&candidate), 0);

        // Fund the new registrant so the voter pool keeps pace with
        // the growing majority threshold
        loop {
            match engine.fund(&candidate, Decimal::from(10)) {
                Ok(()) => break,
                Err(Error::Ledger(surety_ledger::Error::NotOperational)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        voters.push(candidate);
    }

    toggler.join().unwrap();
    assert!(engine.is_operational());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: a qualifying delay credits exactly 1.5x the premium,
    /// for any premium within the insurable cap.
    #[test]
    fn prop_payout_is_exactly_one_and_a_half_premiums(cents in 1u64..=100u64) {
        let engine = test_engine();
        let airline = addr("airline-1");
        let passenger = addr("passenger-6");
        let premium = Decimal::new(cents as i64, 2);

        engine.register_flight(&airline, "ND1309", 100).unwrap();
        engine.buy(&passenger, &airline, "ND1309", premium).unwrap();
        engine
            .update_flight_status(&airline, "ND1309", 100, FlightStatus::LateAirline)
            .unwrap();

        prop_assert_eq!(
            engine.get_passenger_credit(&passenger),
            premium * Decimal::new(15, 1)
        );

        // Withdraw once, never twice
        prop_assert_eq!(engine.withdraw(&passenger).unwrap(), premium * Decimal::new(15, 1));
        prop_assert!(engine.withdraw(&passenger).is_err());
    }

    /// Property: past the founding cohort, admission happens exactly at
    /// the strict-majority vote and never before.
    #[test]
    fn prop_admission_at_strict_majority(extra_registrants in 0usize..6) {
        let engine = test_engine();
        let founder = addr("airline-1");

        // Build a registry of (4 + extra) funded registrants, gathering
        // votes from distinct funded voters whenever consensus applies
        let mut voters = vec![founder.clone()];
        for idx in 0..(3 + extra_registrants) {
            let airline = addr(&format!("airline-{}", idx + 2));
            let mut admission = engine.register_airline(&founder, &airline).unwrap();
            let mut next_voter = 1;
            while !admission.is_admitted() {
                admission = engine
                    .register_airline(&voters[next_voter], &airline)
                    .unwrap();
                next_voter += 1;
            }
            engine.fund(&airline, Decimal::from(10)).unwrap();
            voters.push(airline);
        }

        let registered = engine.ledger().registered_count();
        prop_assert_eq!(registered, 4 + extra_registrants);

        let candidate = addr("airline-candidate");
        let required = registered / 2 + 1;

        for (idx, voter) in voters.iter().take(required).enumerate() {
            let admission = engine.register_airline(voter, &candidate).unwrap();
            let votes = idx + 1;
            if votes < required {
                prop_assert_eq!(admission, Admission::Pending { votes, required });
                prop_assert!(!engine.is_registered(&candidate));
            } else {
                prop_assert_eq!(admission, Admission::Admitted);
                prop_assert!(engine.is_registered(&candidate));
            }
        }
    }
}
