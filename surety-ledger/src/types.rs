//! Core types for the registry
//!
//! All types are designed for:
//! - Deterministic behavior (no floats; Decimal for money)
//! - Memory safety (no unsafe code)
//! - Serialization at the transport boundary (serde derives only)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant identifier (address-like key for owner, airlines, passengers)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create new address
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flight status code
///
/// Numeric codes match the reporting feed's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlightStatus {
    /// No observation received yet (initial state)
    Unknown = 0,
    /// Flight departed on time
    OnTime = 10,
    /// Delay caused by the airline
    LateAirline = 20,
    /// Delay caused by weather
    LateWeather = 30,
    /// Delay caused by a technical fault
    LateTechnical = 40,
    /// Delay for any other reason
    LateOther = 50,
}

impl FlightStatus {
    /// Numeric wire code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Parse from numeric wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FlightStatus::Unknown),
            10 => Some(FlightStatus::OnTime),
            20 => Some(FlightStatus::LateAirline),
            30 => Some(FlightStatus::LateWeather),
            40 => Some(FlightStatus::LateTechnical),
            50 => Some(FlightStatus::LateOther),
            _ => None,
        }
    }

    /// Parse from symbolic name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "UNKNOWN" => Some(FlightStatus::Unknown),
            "ON_TIME" => Some(FlightStatus::OnTime),
            "LATE_AIRLINE" => Some(FlightStatus::LateAirline),
            "LATE_WEATHER" => Some(FlightStatus::LateWeather),
            "LATE_TECHNICAL" => Some(FlightStatus::LateTechnical),
            "LATE_OTHER" => Some(FlightStatus::LateOther),
            _ => None,
        }
    }

    /// Symbolic name
    pub fn name(&self) -> &'static str {
        match self {
            FlightStatus::Unknown => "UNKNOWN",
            FlightStatus::OnTime => "ON_TIME",
            FlightStatus::LateAirline => "LATE_AIRLINE",
            FlightStatus::LateWeather => "LATE_WEATHER",
            FlightStatus::LateTechnical => "LATE_TECHNICAL",
            FlightStatus::LateOther => "LATE_OTHER",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Airline record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    /// Airline identity
    pub address: Address,

    /// Admitted to the registry (directly or via voting consensus)
    pub registered: bool,

    /// Has contributed at least the minimum stake (irreversible)
    pub funded: bool,

    /// Cumulative stake contributed (overpayment is retained)
    pub total_stake: Decimal,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Airline {
    /// Create a new pending (unregistered, unfunded) record
    pub fn pending(address: Address) -> Self {
        Self {
            address,
            registered: false,
            funded: false,
            total_stake: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Eligible to propose, vote, and register flights
    pub fn is_participant(&self) -> bool {
        self.registered && self.funded
    }
}

/// Composite flight key, immutable once registered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightKey {
    /// Operating airline
    pub airline: Address,

    /// Flight designator (e.g. "ND1309")
    pub designator: String,

    /// Scheduled departure (Unix seconds, caller-supplied)
    pub timestamp: i64,
}

impl FlightKey {
    /// Create a new flight key
    pub fn new(airline: Address, designator: impl Into<String>, timestamp: i64) -> Self {
        Self {
            airline,
            designator: designator.into(),
            timestamp,
        }
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.airline, self.designator, self.timestamp)
    }
}

/// Insurance policy held by one passenger on one flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    /// Unique policy ID
    pub policy_id: Uuid,

    /// Insured passenger
    pub passenger: Address,

    /// Premium paid at purchase time (fixed thereafter)
    pub premium: Decimal,

    /// Payout already credited (at most once)
    pub credited: bool,

    /// Purchase timestamp
    pub purchased_at: DateTime<Utc>,
}

impl InsurancePolicy {
    /// Create a new uncredited policy
    pub fn new(passenger: Address, premium: Decimal) -> Self {
        Self {
            policy_id: Uuid::now_v7(),
            passenger,
            premium,
            credited: false,
            purchased_at: Utc::now(),
        }
    }
}

/// Flight record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    /// Immutable composite key
    pub key: FlightKey,

    /// Last recorded status (last write wins)
    pub status: FlightStatus,

    /// Policies in purchase order
    pub policies: Vec<InsurancePolicy>,

    /// Registration timestamp
    pub created_at: DateTime<Utc>,
}

impl Flight {
    /// Create a new flight with status [`FlightStatus::Unknown`]
    pub fn new(key: FlightKey) -> Self {
        Self {
            key,
            status: FlightStatus::Unknown,
            policies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the passenger already holds a policy on this flight
    pub fn has_policy(&self, passenger: &Address) -> bool {
        self.policies.iter().any(|p| &p.passenger == passenger)
    }

    /// Insured passengers in purchase order
    pub fn insurees(&self) -> Vec<Address> {
        self.policies.iter().map(|p| p.passenger.clone()).collect()
    }
}
