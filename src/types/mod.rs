//! Core data types.
//!
//! - [`Order`]: an incoming or resting limit order
//! - [`Side`]: Buy or Sell
//! - [`Trade`]: one fill between an incoming and a resting order
//! - [`price`]: decimal <-> tick conversion
//!
//! All prices are `u64` tick counts. See [`price`] for the conversion rules.

mod order;
mod trade;
pub mod price;

pub use order::{Order, Side};
pub use trade::Trade;
