//! Order record for the matching engine.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so the resting book can be
//! encoded byte-for-byte identically on every run (see
//! [`OrderBook::compute_state_root`](crate::orderbook::OrderBook::compute_state_root)).
//! Enum fields are stored as raw `u8` for that reason.
//!
//! ## Prices
//!
//! `price` is a tick count, never a float. Use [`crate::types::price`] to
//! convert human prices into ticks.

use ssz_rs::prelude::*;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Bid side, best = highest price
    #[default]
    Buy,
    /// Ask side, best = lowest price
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Whether a resting order on the opposite side at `resting_price` can
    /// trade with an incoming order of this side limited at `limit`.
    ///
    /// ```
    /// use tickbook::types::Side;
    ///
    /// assert!(Side::Buy.crosses(101, 98));
    /// assert!(!Side::Buy.crosses(97, 98));
    /// assert!(Side::Sell.crosses(90, 100));
    /// ```
    #[inline]
    pub fn crosses(self, limit: u64, resting_price: u64) -> bool {
        match self {
            Side::Buy => resting_price <= limit,
            Side::Sell => resting_price >= limit,
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A limit order, either incoming or resting.
///
/// `sequence` is zero until the engine accepts the order; the matcher stamps
/// it inside the exclusive section so it follows acceptance order exactly.
///
/// ## Example
///
/// ```
/// use tickbook::types::{Order, Side};
///
/// let order = Order::new(7, Side::Buy, 101, 15);
/// assert_eq!(order.remaining, 15);
/// assert!(!order.fill_or_kill);
///
/// let fok = Order::fill_or_kill(3, Side::Buy, 95, 10);
/// assert!(fok.fill_or_kill);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Caller-assigned identifier, unique among resting orders
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price in ticks
    pub price: u64,

    /// Quantity at submission
    pub quantity: u64,

    /// Quantity still open; decremented by matching
    pub remaining: u64,

    /// Discard any unmatched remainder instead of resting it
    pub fill_or_kill: bool,

    /// Admission sequence, the time-priority tie-break at equal price
    pub sequence: u64,
}

impl Order {
    /// Create a plain limit order.
    pub fn new(id: u64, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity,
            remaining: quantity,
            fill_or_kill: false,
            sequence: 0,
        }
    }

    /// Create a fill-or-kill limit order.
    pub fn fill_or_kill(id: u64, side: Side, price: u64, quantity: u64) -> Self {
        Self {
            fill_or_kill: true,
            ..Self::new(id, side, price, quantity)
        }
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Check if the order is fully filled
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Get the filled quantity
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Fill a portion of this order
    ///
    /// Returns the quantity actually filled, capped at `remaining`.
    pub fn fill(&mut self, fill_qty: u64) -> u64 {
        let actual_fill = fill_qty.min(self.remaining);
        self.remaining -= actual_fill;
        actual_fill
    }

    /// Drop whatever is still open, returning the discarded quantity.
    pub fn kill_remaining(&mut self) -> u64 {
        std::mem::take(&mut self.remaining)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
