//! Matching engine.
//!
//! ## Matching Rules
//!
//! - **Buy orders** match against asks, lowest price first
//! - **Sell orders** match against bids, highest price first
//! - Within a price, the oldest order (lowest admission sequence) fills first
//! - Trades execute at the resting order's price
//! - Unfilled quantity rests, unless the order is fill-or-kill
//!
//! [`Matcher`] is the single-threaded core; [`MatchingEngine`] serializes
//! concurrent callers through one lock.
//!
//! ## Example
//!
//! ```
//! use tickbook::engine::{MatchingEngine, OrderState};
//! use tickbook::types::{Order, Side};
//!
//! let engine = MatchingEngine::new();
//!
//! engine.submit(Order::new(1, Side::Sell, 100, 10)).unwrap();
//! let result = engine.submit(Order::new(2, Side::Buy, 100, 10)).unwrap();
//!
//! assert_eq!(result.state, OrderState::FullyFilled);
//! assert_eq!(result.trades.len(), 1);
//! ```

pub mod matcher;
pub mod exclusive;

pub use matcher::{Matcher, OrderState, SubmitResult};
pub use exclusive::MatchingEngine;
