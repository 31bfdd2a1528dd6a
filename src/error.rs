//! Error types.
//!
//! Every engine error is detected before the book is touched, so an `Err`
//! always means "nothing changed".

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections reported by `submit` and `cancel`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("order {order_id} is already resting")]
    DuplicateOrder { order_id: u64 },

    #[error("order {order_id} not found")]
    OrderNotFound { order_id: u64 },

    #[error("invalid order {order_id}: {reason}")]
    InvalidOrder { order_id: u64, reason: &'static str },
}

impl EngineError {
    /// The order id the error refers to.
    pub fn order_id(&self) -> u64 {
        match self {
            EngineError::DuplicateOrder { order_id }
            | EngineError::OrderNotFound { order_id }
            | EngineError::InvalidOrder { order_id, .. } => *order_id,
        }
    }
}

/// Failures converting a decimal price to ticks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("cannot parse price {input:?}")]
    Unparsable { input: String },

    #[error("price {price} is negative")]
    Negative { price: Decimal },

    #[error("price {price} is not a multiple of tick size {tick_size}")]
    OffTick { price: Decimal, tick_size: Decimal },

    #[error("price {price} does not fit in a tick count")]
    Overflow { price: Decimal },

    #[error("tick size must be positive, got {tick_size}")]
    InvalidTickSize { tick_size: Decimal },
}

/// Failures loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<PriceError> for ConfigError {
    fn from(err: PriceError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        assert_eq!(
            EngineError::DuplicateOrder { order_id: 4 }.to_string(),
            "order 4 is already resting"
        );
        assert_eq!(
            EngineError::OrderNotFound { order_id: 9 }.to_string(),
            "order 9 not found"
        );
        assert_eq!(
            EngineError::InvalidOrder {
                order_id: 1,
                reason: "quantity must be positive"
            }
            .to_string(),
            "invalid order 1: quantity must be positive"
        );
    }

    #[test]
    fn test_engine_error_order_id() {
        assert_eq!(EngineError::OrderNotFound { order_id: 42 }.order_id(), 42);
    }
}
