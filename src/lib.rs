//! # tickbook
//!
//! In-memory limit order matching engine for a single instrument.
//!
//! ## Architecture
//!
//! - **Types**: [`Order`], [`Trade`], tick conversion
//! - **OrderBook**: slab arena + per-side price levels + id locator
//! - **Engine**: price-time priority [`Matcher`] behind a single lock
//!   ([`MatchingEngine`])
//!
//! ## Design Principles
//!
//! 1. **No Floating Point**: prices are `u64` ticks
//! 2. **Stable Keys**: levels and the locator refer to orders by slab key,
//!    never by reference
//! 3. **All-or-nothing errors**: every rejection is detected before the book
//!    is touched
//! 4. **Linearizable**: calls take effect in lock-acquisition order

pub mod types;

pub mod error;

pub mod config;

pub mod orderbook;

pub mod engine;

pub use config::{EngineConfig, FillOrKillPolicy};
pub use engine::{Matcher, MatchingEngine, OrderState, SubmitResult};
pub use error::{ConfigError, EngineError, PriceError};
pub use orderbook::{OrderBook, PriceLevel};
pub use types::{Order, Side, Trade};
