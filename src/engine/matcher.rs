//! Price-time priority matcher.
//!
//! `Matcher` is the single-threaded core: it owns the [`OrderBook`] and
//! requires `&mut self` for every mutation. Shared, concurrent access goes
//! through [`MatchingEngine`](crate::engine::MatchingEngine), which wraps a
//! `Matcher` in one exclusive section.
//!
//! ## Submit
//!
//! 1. Reject an unknown side byte or zero quantity (`InvalidOrder`), or an
//!    id already resting (`DuplicateOrder`). Nothing is mutated on rejection.
//! 2. Stamp the next admission sequence.
//! 3. While the incoming order has quantity and the opposite best price
//!    crosses its limit, fill the FIFO head of the best opposite level at
//!    the resting price.
//! 4. Fill-or-kill: discard whatever is left.
//! 5. Rest any remainder at the tail of its own level.

use tracing::{debug, info, warn};

use crate::config::{EngineConfig, FillOrKillPolicy};
use crate::error::EngineError;
use crate::orderbook::OrderBook;
use crate::types::{Order, Side, Trade};

/// Final state of an accepted order after `submit` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderState {
    /// All quantity traded
    FullyFilled,
    /// Nothing traded; all quantity is resting
    Resting,
    /// Some quantity traded; the rest is resting
    PartiallyFilledResting,
    /// Fill-or-kill: some quantity traded, the remainder was discarded
    PartiallyFilledCancelled,
    /// Fill-or-kill: nothing traded, all quantity was discarded
    Cancelled,
}

impl OrderState {
    /// Whether the order left anything on the book.
    pub fn is_resting(self) -> bool {
        matches!(self, OrderState::Resting | OrderState::PartiallyFilledResting)
    }
}

/// Outcome of a successful `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub order_id: u64,

    /// Admission sequence stamped on the order
    pub sequence: u64,

    /// Fills in execution order
    pub trades: Vec<Trade>,

    pub state: OrderState,

    /// Quantity left resting on the book (zero unless `state.is_resting()`)
    pub remaining: u64,

    /// Quantity discarded by fill-or-kill
    pub killed: u64,
}

impl SubmitResult {
    /// Total quantity traded by this submission.
    pub fn filled_quantity(&self) -> u64 {
        self.trades.iter().map(|t| t.quantity).sum()
    }

    pub fn is_fully_filled(&self) -> bool {
        self.state == OrderState::FullyFilled
    }
}

/// Single-threaded matching core.
#[derive(Debug, Clone)]
pub struct Matcher {
    book: OrderBook,
    fill_or_kill: FillOrKillPolicy,
    next_sequence: u64,
    next_trade_id: u64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            book: OrderBook::with_capacity(config.order_capacity),
            fill_or_kill: config.fill_or_kill,
            next_sequence: 1,
            next_trade_id: 1,
        }
    }

    #[inline]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    #[inline]
    pub fn fill_or_kill_policy(&self) -> FillOrKillPolicy {
        self.fill_or_kill
    }

    #[inline]
    pub fn best_price(&self, side: Side) -> Option<u64> {
        self.book.best_price(side)
    }

    #[inline]
    pub fn depth_at(&self, side: Side, price: u64) -> u64 {
        self.book.depth_at(side, price)
    }

    /// Match an incoming order and rest any remainder.
    pub fn submit(&mut self, mut order: Order) -> Result<SubmitResult, EngineError> {
        self.admit(&order).inspect_err(|err| {
            warn!(order_id = order.id, %err, "order rejected");
        })?;

        order.sequence = self.next_sequence;
        self.next_sequence += 1;

        let side = order.side();
        let opposite = side.opposite();
        let mut trades = Vec::new();

        let killed_upfront = order.fill_or_kill
            && self.fill_or_kill == FillOrKillPolicy::AllOrNothing
            && self.book.side(opposite).crossing_quantity(order.price, order.remaining)
                < order.remaining;

        if !killed_upfront {
            while order.remaining > 0 {
                let Some(best) = self.book.best_price(opposite) else {
                    break;
                };
                if !side.crosses(order.price, best) {
                    break;
                }
                let Some(fill) = self.book.fill_best(opposite, order.remaining) else {
                    break;
                };

                order.fill(fill.quantity);
                let trade = Trade::new(
                    self.next_trade_id,
                    fill.order_id,
                    order.id,
                    fill.price,
                    fill.quantity,
                );
                self.next_trade_id += 1;

                debug!(
                    trade_id = trade.id,
                    incoming = order.id,
                    resting = fill.order_id,
                    price = fill.price,
                    quantity = fill.quantity,
                    resting_done = fill.exhausted,
                    "trade"
                );
                trades.push(trade);
            }
        }

        let mut killed = 0;
        if order.fill_or_kill && order.remaining > 0 {
            killed = order.kill_remaining();
            info!(
                order_id = order.id,
                killed,
                matched = order.filled_quantity(),
                "fill-or-kill remainder cancelled"
            );
        }

        let remaining = order.remaining;
        let sequence = order.sequence;
        let order_id = order.id;

        if remaining > 0 {
            debug!(order_id, ?side, price = order.price, remaining, "resting");
            self.book.insert_resting(order)?;
        }

        let state = match (trades.is_empty(), remaining > 0, killed > 0) {
            (_, false, false) => OrderState::FullyFilled,
            (true, true, _) => OrderState::Resting,
            (false, true, _) => OrderState::PartiallyFilledResting,
            (true, false, true) => OrderState::Cancelled,
            (false, false, true) => OrderState::PartiallyFilledCancelled,
        };

        Ok(SubmitResult {
            order_id,
            sequence,
            trades,
            state,
            remaining,
            killed,
        })
    }

    /// Remove a resting order, returning it with its remaining quantity.
    pub fn cancel(&mut self, order_id: u64) -> Result<Order, EngineError> {
        match self.book.remove_order(order_id) {
            Some(order) => {
                debug!(order_id, remaining = order.remaining, "cancelled");
                Ok(order)
            }
            None => {
                warn!(order_id, "cancel for unknown order");
                Err(EngineError::OrderNotFound { order_id })
            }
        }
    }

    fn admit(&self, order: &Order) -> Result<(), EngineError> {
        if Side::from_u8(order.side_raw).is_none() {
            return Err(EngineError::InvalidOrder {
                order_id: order.id,
                reason: "unknown side",
            });
        }
        if order.remaining == 0 {
            return Err(EngineError::InvalidOrder {
                order_id: order.id,
                reason: "quantity must be positive",
            });
        }
        if order.remaining > order.quantity {
            return Err(EngineError::InvalidOrder {
                order_id: order.id,
                reason: "remaining exceeds quantity",
            });
        }
        if self.book.contains_order(order.id) {
            return Err(EngineError::DuplicateOrder { order_id: order.id });
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
