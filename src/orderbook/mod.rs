//! Resting order book.
//!
//! ## Components
//!
//! - [`OrderNode`]: an `Order` plus linked-list pointers (slab keys)
//! - [`PriceLevel`]: FIFO queue of orders at one price
//! - [`SideBook`]: price levels for one side, iterated best-first
//! - [`OrderLocator`]: order id -> [`Location`] for O(1) cancel
//! - [`OrderBook`]: owns the slab and keeps the three structures in lockstep
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Rest order | O(log L) |
//! | Cancel by id | O(log L) |
//! | Best bid/ask | O(log L) |
//! | Fill best head | O(log L) |
//!
//! L is the number of price levels on the side touched.

pub mod node;
pub mod level;
pub mod side;
pub mod locator;
pub mod book;

pub use node::OrderNode;
pub use level::{LevelIter, PriceLevel};
pub use side::SideBook;
pub use locator::{Location, OrderLocator};
pub use book::{Fill, OrderBook};
