//! Trade type representing one fill between an incoming and a resting order.

/// A single fill.
///
/// ## Price Discovery
///
/// The trade always executes at the resting order's price, never the
/// incoming limit.
///
/// ## Example
///
/// ```
/// use tickbook::types::Trade;
///
/// let trade = Trade::new(1, 6, 7, 98, 15);
/// assert_eq!(trade.resting_order_id, 6);
/// assert_eq!(trade.notional_raw(), 98 * 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trade {
    /// Engine-assigned trade identifier, increasing in execution order
    pub id: u64,

    /// The resting (maker) order that was hit
    pub resting_order_id: u64,

    /// The incoming (taker) order
    pub incoming_order_id: u64,

    /// Execution price in ticks (the resting order's price)
    pub price: u64,

    /// Executed quantity
    pub quantity: u64,
}

impl Trade {
    pub fn new(
        id: u64,
        resting_order_id: u64,
        incoming_order_id: u64,
        price: u64,
        quantity: u64,
    ) -> Self {
        Self {
            id,
            resting_order_id,
            incoming_order_id,
            price,
            quantity,
        }
    }

    /// Price times quantity in ticks. Widened so it cannot overflow.
    pub fn notional_raw(&self) -> u128 {
        (self.price as u128) * (self.quantity as u128)
    }
}
