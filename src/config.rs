//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.
//!
//! ```toml
//! order_capacity = 100000
//! tick_size = "0.01"
//! fill_or_kill = "discard_remainder"   # or "all_or_nothing"
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::price::validate_tick_size;

/// How a fill-or-kill order treats quantity it cannot fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOrKillPolicy {
    /// Match what crosses, then discard the unmatched remainder instead of
    /// resting it. Trades already made stand.
    #[default]
    DiscardRemainder,

    /// Check first whether the crossing liquidity covers the whole order.
    /// If it does not, kill the order with no trades.
    AllOrNothing,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Resting orders to pre-allocate room for
    pub order_capacity: usize,

    /// Price of one tick, used to convert decimal prices
    pub tick_size: Decimal,

    pub fill_or_kill: FillOrKillPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            order_capacity: 10_000,
            tick_size: Decimal::new(1, 2),
            fill_or_kill: FillOrKillPolicy::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.order_capacity == 0 {
            return Err(ConfigError::Invalid("order_capacity must be positive".into()));
        }
        validate_tick_size(self.tick_size)?;
        Ok(())
    }
}
