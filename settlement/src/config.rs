//! Configuration for settlement engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settlement engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Netting configuration
    #[serde(default)]
    pub netting: NettingConfig,
}

/// Netting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Balances within this distance of zero count as settled
    /// (one minor currency unit)
    pub tolerance: Decimal,

    /// Decimal places transfer amounts are rounded to
    pub decimal_places: u32,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2), // 0.01
            decimal_places: 2,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(tolerance) = std::env::var("SETTLEMENT_TOLERANCE") {
            config.netting.tolerance = Decimal::from_str(&tolerance).map_err(|e| {
                crate::Error::Config(format!("Invalid SETTLEMENT_TOLERANCE {}: {}", tolerance, e))
            })?;
        }

        if let Ok(places) = std::env::var("SETTLEMENT_DECIMAL_PLACES") {
            config.netting.decimal_places = places.parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SETTLEMENT_DECIMAL_PLACES {}: {}", places, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the netting step cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.netting.tolerance < Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "Tolerance must not be negative, got {}",
                self.netting.tolerance
            )));
        }

        // Decimal keeps at most 28 fractional digits
        if self.netting.decimal_places > 28 {
            return Err(crate::Error::Config(format!(
                "Decimal places must be at most 28, got {}",
                self.netting.decimal_places
            )));
        }

        Ok(())
    }
}
