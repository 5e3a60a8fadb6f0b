//! Configuration for the governance engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Governance engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Admission and payout policy
    pub policy: PolicyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "surety-governance".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            policy: PolicyConfig::default(),
        }
    }
}

/// Admission and payout policy knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Airlines admitted without voting (default: 4)
    pub founding_cohort_size: usize,

    /// Minimum stake that marks an airline funded (default: 10 units)
    pub min_airline_stake: Decimal,

    /// Maximum insurable premium per policy (default: 1 unit)
    pub max_insurance_premium: Decimal,

    /// Payout ratio applied to the premium on a qualifying delay
    /// (default: 1.5)
    pub payout_multiplier: Decimal,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            founding_cohort_size: 4,
            min_airline_stake: Decimal::from(10),
            max_insurance_premium: Decimal::ONE,
            payout_multiplier: Decimal::new(15, 1), // 1.5x
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(stake) = std::env::var("SURETY_MIN_AIRLINE_STAKE") {
            config.policy.min_airline_stake = stake
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid stake: {}", stake)))?;
        }

        if let Ok(cap) = std::env::var("SURETY_MAX_INSURANCE_PREMIUM") {
            config.policy.max_insurance_premium = cap
                .parse()
                .map_err(|_| crate::Error::Config(format!("Invalid premium cap: {}", cap)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check policy invariants
    pub fn validate(&self) -> crate::Result<()> {
        if self.policy.founding_cohort_size == 0 {
            return Err(crate::Error::Config(
                "Founding cohort must admit at least one airline".to_string(),
            ));
        }
        if self.policy.min_airline_stake <= Decimal::ZERO {
            return Err(crate::Error::Config(
                "Minimum airline stake must be positive".to_string(),
            ));
        }
        if self.policy.max_insurance_premium <= Decimal::ZERO {
            return Err(crate::Error::Config(
                "Insurable premium cap must be positive".to_string(),
            ));
        }
        if self.policy.payout_multiplier <= Decimal::ZERO {
            return Err(crate::Error::Config(
                "Payout multiplier must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "surety-governance");
        assert_eq!(config.policy.founding_cohort_size, 4);
        assert_eq!(config.policy.min_airline_stake, Decimal::from(10));
        assert_eq!(config.policy.payout_multiplier, Decimal::new(15, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let mut config = Config::default();
        config.policy.min_airline_stake = Decimal::ZERO;
        assert!(config.validate().is_err());
    }
}
