//! The resting order book.
//!
//! ## Architecture
//!
//! Three cross-referenced structures, mutated only together:
//!
//! - **Slab**: stable slot table that owns every resting `OrderNode`
//! - **SideBook** x2: price levels per side, each level a FIFO of slab keys
//! - **OrderLocator**: order id -> (side, price, slab key) for O(1) cancel
//!
//! Levels and the locator never hold references into the slab, only keys,
//! so no mutation can leave a dangling handle. An order leaves all three in
//! the same call that fully fills or cancels it.
//!
//! ## Price Ordering
//!
//! - **Bids**: best = highest price
//! - **Asks**: best = lowest price
//!
//! ## Example
//!
//! ```
//! use tickbook::orderbook::OrderBook;
//! use tickbook::types::{Order, Side};
//!
//! let mut book = OrderBook::with_capacity(1_000);
//!
//! book.insert_resting(Order::new(1, Side::Buy, 100, 10)).unwrap();
//! book.insert_resting(Order::new(2, Side::Sell, 102, 5)).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(100));
//! assert_eq!(book.best_ask(), Some(102));
//! assert_eq!(book.spread(), Some(2));
//! ```

use sha2::{Digest, Sha256};
use slab::Slab;

use crate::error::EngineError;
use crate::orderbook::{Location, OrderLocator, OrderNode, SideBook};
use crate::types::{Order, Side};

/// Result of filling the head of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// The resting order that was filled
    pub order_id: u64,
    /// Its price, which is the execution price
    pub price: u64,
    /// Quantity filled
    pub quantity: u64,
    /// The resting order reached zero and was removed from the book
    pub exhausted: bool,
}

/// Resting order book for one instrument.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Owns every resting order; keys are stable until removal
    orders: Slab<OrderNode>,

    bids: SideBook,

    asks: SideBook,

    locator: OrderLocator,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            orders: Slab::new(),
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
            locator: OrderLocator::new(),
        }
    }

    /// Create a book with room for `order_capacity` resting orders before
    /// the slab or locator reallocate.
    ///
    /// ```
    /// use tickbook::orderbook::OrderBook;
    ///
    /// let book = OrderBook::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            bids: SideBook::new(Side::Buy),
            asks: SideBook::new(Side::Sell),
            locator: OrderLocator::with_capacity(order_capacity),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Total resting orders on both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.order_count()
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.order_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn bid_levels(&self) -> usize {
        self.bids.level_count()
    }

    #[inline]
    pub fn ask_levels(&self) -> usize {
        self.asks.level_count()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[inline]
    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    #[inline]
    pub fn locator(&self) -> &OrderLocator {
        &self.locator
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.locator.contains(order_id)
    }

    #[inline]
    pub fn locate(&self, order_id: u64) -> Option<Location> {
        self.locator.locate(order_id)
    }

    /// The resting order with this id, if any.
    pub fn get_order(&self, order_id: u64) -> Option<&Order> {
        let location = self.locator.locate(order_id)?;
        self.orders.get(location.key).map(|node| &node.order)
    }

    /// Resting orders on one side, best price first and FIFO within a price.
    pub fn iter_side(&self, side: Side) -> impl Iterator<Item = &Order> + '_ {
        self.side(side)
            .levels()
            .flat_map(move |level| level.iter(&self.orders))
    }

    // ========================================================================
    // Best Bid/Ask and Depth
    // ========================================================================

    #[inline]
    pub fn best_price(&self, side: Side) -> Option<u64> {
        self.side(side).best_price()
    }

    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best_price()
    }

    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best_price()
    }

    /// `best_ask - best_bid`, or None if either side is empty.
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Aggregate resting quantity at one price.
    #[inline]
    pub fn depth_at(&self, side: Side, price: u64) -> u64 {
        self.side(side).depth_at(price)
    }

    /// Up to `levels` `(price, quantity)` pairs, best first.
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(u64, u64)> {
        self.side(side)
            .levels()
            .take(levels)
            .map(|level| (level.price, level.total_quantity))
            .collect()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    fn split_mut(&mut self, side: Side) -> (&mut SideBook, &mut Slab<OrderNode>) {
        match side {
            Side::Buy => (&mut self.bids, &mut self.orders),
            Side::Sell => (&mut self.asks, &mut self.orders),
        }
    }

    /// Rest an order at the tail of its price level and index it.
    ///
    /// Rejects, without touching the book, an order whose id is already
    /// resting, that has nothing left to rest, or whose side byte is unknown.
    pub fn insert_resting(&mut self, order: Order) -> Result<usize, EngineError> {
        let order_id = order.id;
        let Some(side) = Side::from_u8(order.side_raw) else {
            return Err(EngineError::InvalidOrder {
                order_id,
                reason: "unknown side",
            });
        };
        if order.remaining == 0 {
            return Err(EngineError::InvalidOrder {
                order_id,
                reason: "nothing left to rest",
            });
        }
        if self.locator.contains(order_id) {
            return Err(EngineError::DuplicateOrder { order_id });
        }
        let price = order.price;

        let (side_book, orders) = self.split_mut(side);
        let key = orders.insert(OrderNode::new(order));
        side_book.push_back(key, orders);
        self.locator.insert(order_id, Location { side, price, key });

        Ok(key)
    }

    /// Fill the oldest order at the best price of `side` by up to
    /// `max_quantity`.
    ///
    /// If that exhausts it, the order is dropped from its level, the locator
    /// and the slab, and an emptied level is dropped from the side.
    pub fn fill_best(&mut self, side: Side, max_quantity: u64) -> Option<Fill> {
        let (side_book, orders) = self.split_mut(side);

        let level = side_book.best_level_mut()?;
        let price = level.price;
        let key = level.peek_head()?;
        let node = orders.get_mut(key)?;

        let order_id = node.order_id();
        let quantity = node.fill(max_quantity);
        let exhausted = node.is_filled();
        level.reduce_quantity(quantity);

        if exhausted {
            side_book.unlink(price, key, orders);
            orders.remove(key);
            self.locator.remove(order_id);
        }

        Some(Fill {
            order_id,
            price,
            quantity,
            exhausted,
        })
    }

    /// Remove a resting order by id, returning it with its remaining
    /// quantity.
    pub fn remove_order(&mut self, order_id: u64) -> Option<Order> {
        let location = self.locator.remove(order_id)?;
        let (side_book, orders) = self.split_mut(location.side);
        side_book.unlink(location.price, location.key, orders);
        orders.try_remove(location.key).map(|node| node.order)
    }

    /// Drop every resting order.
    pub fn clear(&mut self) {
        self.orders.clear();
        self.bids.clear();
        self.asks.clear();
        self.locator.clear();
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every resting order, bids then asks,
    /// best price first, FIFO within a level.
    ///
    /// Two books built from the same sequence of calls have the same root.
    pub fn compute_state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for side in [Side::Buy, Side::Sell] {
            for order in self.iter_side(side) {
                // Fixed-size container of basic types; encoding cannot fail.
                let bytes = ssz_rs::serialize(order).unwrap_or_default();
                hasher.update(&bytes);
            }
        }
        hasher.finalize().into()
    }

    pub fn state_root_hex(&self) -> String {
        hex::encode(self.compute_state_root())
    }

    // ========================================================================
    // Consistency
    // ========================================================================

    /// Cross-check the slab, both side books and the locator.
    ///
    /// Returns a description of the first violation found. Intended for
    /// tests and debugging; it walks the whole book.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut seen = 0usize;

        for side_book in [&self.bids, &self.asks] {
            let side = side_book.side();
            let mut side_orders = 0usize;

            for level in side_book.levels() {
                if level.is_empty() {
                    return Err(format!("{side:?} level {} is empty", level.price));
                }

                let mut sum = 0u64;
                let mut count = 0usize;
                let mut last_sequence = None;
                for order in level.iter(&self.orders) {
                    if order.remaining == 0 {
                        return Err(format!("order {} rests with zero quantity", order.id));
                    }
                    if order.side() != side || order.price != level.price {
                        return Err(format!("order {} is filed under the wrong level", order.id));
                    }
                    if last_sequence.is_some_and(|last| order.sequence <= last) {
                        return Err(format!("order {} breaks FIFO sequence order", order.id));
                    }
                    match self.locator.locate(order.id) {
                        Some(loc) if loc.side == side && loc.price == level.price => {}
                        _ => {
                            return Err(format!(
                                "order {} has no matching locator entry",
                                order.id
                            ))
                        }
                    }
                    last_sequence = Some(order.sequence);
                    sum += order.remaining;
                    count += 1;
                }

                if count != level.order_count {
                    return Err(format!(
                        "level {} counts {} orders, holds {count}",
                        level.price, level.order_count
                    ));
                }
                if sum != level.total_quantity {
                    return Err(format!(
                        "level {} totals {}, holds {sum}",
                        level.price, level.total_quantity
                    ));
                }
                side_orders += count;
            }

            if side_orders != side_book.order_count() {
                return Err(format!(
                    "{side:?} side counts {}, holds {side_orders}",
                    side_book.order_count()
                ));
            }
            seen += side_orders;
        }

        if seen != self.orders.len() || seen != self.locator.len() {
            return Err(format!(
                "levels hold {seen} orders, slab {}, locator {}",
                self.orders.len(),
                self.locator.len()
            ));
        }

        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            if bid >= ask {
                return Err(format!("book is crossed: bid {bid} >= ask {ask}"));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn buy(id: u64, price: u64, quantity: u64) -> Order {
        Order::new(id, Side::Buy, price, quantity)
    }

    fn sell(id: u64, price: u64, quantity: u64) -> Order {
        Order::new(id, Side::Sell, price, quantity)
    }

    fn sequenced(mut order: Order, sequence: u64) -> Order {
        order.sequence = sequence;
        order
    }

    #[test]
    fn test_book_new() {
        let book = OrderBook::new();

        assert!(book.is_empty());
        assert_eq!(book.bid_count(), 0);
        assert_eq!(book.ask_count(), 0);
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        assert!(book.spread().is_none());
        assert!(book.check_consistency().is_ok());
    }

    #[test]
    fn test_insert_resting_indexes_order() {
        let mut book = OrderBook::with_capacity(16);

        let key = book.insert_resting(buy(1, 100, 10)).unwrap();

        assert_eq!(book.order_count(), 1);
        assert_eq!(book.bid_count(), 1);
        assert_eq!(
            book.locate(1),
            Some(Location {
                side: Side::Buy,
                price: 100,
                key
            })
        );
        assert_eq!(book.get_order(1).map(|o| o.remaining), Some(10));
        assert!(book.check_consistency().is_ok());
    }

    #[test]
    fn test_remove_order_drops_level_and_index() {
        let mut book = OrderBook::new();
        book.insert_resting(buy(1, 100, 10)).unwrap();
        book.insert_resting(buy(2, 99, 5)).unwrap();

        let removed = book.remove_order(1).unwrap();

        assert_eq!(removed.id, 1);
        assert_eq!(removed.remaining, 10);
        assert_eq!(book.bid_levels(), 1);
        assert_eq!(book.best_bid(), Some(99));
        assert!(!book.contains_order(1));
        assert!(book.check_consistency().is_ok());
    }

    #[test]
    fn test_remove_missing_order() {
        let mut book = OrderBook::new();
        assert!(book.remove_order(999).is_none());
    }

    #[test]
    fn test_insert_resting_rejects_duplicate_id() {
        let mut book = OrderBook::new();
        book.insert_resting(buy(1, 100, 10)).unwrap();
        let root = book.compute_state_root();

        let err = book.insert_resting(buy(1, 101, 5)).unwrap_err();

        assert_eq!(err, EngineError::DuplicateOrder { order_id: 1 });
        assert_eq!(book.compute_state_root(), root);
        assert_eq!(book.order_count(), 1);
        assert!(book.check_consistency().is_ok());

        // The original order is still reachable and cancellable
        assert_eq!(book.remove_order(1).map(|o| o.price), Some(100));
        assert!(book.is_empty());
        assert_eq!(book.depth_at(Side::Buy, 100), 0);
    }

    #[test]
    fn test_insert_resting_rejects_malformed_orders() {
        let mut book = OrderBook::new();

        let mut unknown_side = buy(1, 100, 10);
        unknown_side.side_raw = 7;
        assert!(matches!(
            book.insert_resting(unknown_side),
            Err(EngineError::InvalidOrder { order_id: 1, .. })
        ));

        let mut empty = buy(2, 100, 10);
        empty.remaining = 0;
        assert!(matches!(
            book.insert_resting(empty),
            Err(EngineError::InvalidOrder { order_id: 2, .. })
        ));

        assert!(book.is_empty());
        assert!(book.locator().is_empty());
    }

    #[test]
    fn test_fill_best_partial_keeps_order() {
        let mut book = OrderBook::new();
        book.insert_resting(sell(6, 98, 25)).unwrap();

        let fill = book.fill_best(Side::Sell, 15).unwrap();

        assert_eq!(
            fill,
            Fill {
                order_id: 6,
                price: 98,
                quantity: 15,
                exhausted: false
            }
        );
        assert_eq!(book.depth_at(Side::Sell, 98), 10);
        assert_eq!(book.get_order(6).map(|o| o.remaining), Some(10));
        assert!(book.check_consistency().is_ok());
    }

    #[test]
    fn test_fill_best_exhausts_and_advances() {
        let mut book = OrderBook::new();
        book.insert_resting(sequenced(buy(1, 110, 20), 1)).unwrap();
        book.insert_resting(sequenced(buy(2, 110, 5), 2)).unwrap();
        book.insert_resting(sequenced(buy(3, 105, 15), 3)).unwrap();

        let fill = book.fill_best(Side::Buy, 30).unwrap();
        assert_eq!(fill.order_id, 1);
        assert_eq!(fill.quantity, 20);
        assert!(fill.exhausted);
        assert!(!book.contains_order(1));

        // FIFO: the next head at 110 is order 2
        let fill = book.fill_best(Side::Buy, 10).unwrap();
        assert_eq!(fill.order_id, 2);
        assert!(fill.exhausted);

        // Level 110 is gone; 105 is now best
        assert_eq!(book.best_bid(), Some(105));
        assert_eq!(book.bid_levels(), 1);
        assert!(book.check_consistency().is_ok());
    }

    #[test]
    fn test_fill_best_on_empty_side() {
        let mut book = OrderBook::new();
        assert!(book.fill_best(Side::Sell, 10).is_none());
    }

    #[test]
    fn test_depth_snapshot() {
        let mut book = OrderBook::new();
        book.insert_resting(sell(4, 102, 15)).unwrap();
        book.insert_resting(sell(5, 100, 10)).unwrap();
        book.insert_resting(sell(6, 98, 25)).unwrap();
        book.insert_resting(sell(7, 98, 5)).unwrap();

        assert_eq!(book.depth(Side::Sell, 2), vec![(98, 30), (100, 10)]);
        assert_eq!(book.depth(Side::Buy, 5), vec![]);
    }

    #[test]
    fn test_iter_side_is_price_then_fifo() {
        let mut book = OrderBook::new();
        book.insert_resting(sequenced(buy(1, 100, 10), 1)).unwrap();
        book.insert_resting(sequenced(buy(2, 105, 15), 2)).unwrap();
        book.insert_resting(sequenced(buy(3, 100, 20), 3)).unwrap();

        let ids: Vec<u64> = book.iter_side(Side::Buy).map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_state_root_tracks_contents() {
        let mut a = OrderBook::new();
        let mut b = OrderBook::new();
        assert_eq!(a.compute_state_root(), b.compute_state_root());

        a.insert_resting(buy(1, 100, 10)).unwrap();
        assert_ne!(a.compute_state_root(), b.compute_state_root());

        b.insert_resting(buy(1, 100, 10)).unwrap();
        assert_eq!(a.compute_state_root(), b.compute_state_root());
        assert_eq!(a.state_root_hex().len(), 64);

        // Same orders, different remaining quantity
        a.fill_best(Side::Buy, 1);
        assert_ne!(a.compute_state_root(), b.compute_state_root());
    }

    #[test]
    fn test_clear() {
        let mut book = OrderBook::new();
        book.insert_resting(buy(1, 100, 10)).unwrap();
        book.insert_resting(sell(2, 101, 10)).unwrap();

        book.clear();

        assert!(book.is_empty());
        assert!(book.locator().is_empty());
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_consistency_flags_crossed_book() {
        let mut book = OrderBook::new();
        book.insert_resting(buy(1, 101, 10)).unwrap();
        book.insert_resting(sell(2, 100, 10)).unwrap();

        assert!(book.check_consistency().is_err());
    }
}
