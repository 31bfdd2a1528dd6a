//! One side of the book: price levels ordered best-first.
//!
//! Levels are keyed by tick price in a `BTreeMap`. "Best" is the highest key
//! for bids and the lowest for asks, so a single ascending map serves both
//! sides and only the direction of traversal changes.
//!
//! A `SideBook` never holds an empty level. [`SideBook::unlink`] drops the
//! level in the same call that empties it.

use std::collections::BTreeMap;

use slab::Slab;

use crate::orderbook::{OrderNode, PriceLevel};
use crate::types::Side;

/// Price levels for one side.
#[derive(Debug, Clone)]
pub struct SideBook {
    side: Side,
    levels: BTreeMap<u64, PriceLevel>,
    order_count: usize,
}

impl SideBook {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            order_count: 0,
        }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of resting orders on this side.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Number of price levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Best price on this side: highest bid or lowest ask.
    #[inline]
    pub fn best_price(&self) -> Option<u64> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    pub fn best_level(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values().next_back(),
            Side::Sell => self.levels.values().next(),
        }
    }

    pub fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        match self.side {
            Side::Buy => self.levels.values_mut().next_back(),
            Side::Sell => self.levels.values_mut().next(),
        }
    }

    #[inline]
    pub fn level(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Levels from best to worst.
    pub fn levels(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        }
    }

    /// Aggregate resting quantity at `price`, zero if there is no level.
    pub fn depth_at(&self, price: u64) -> u64 {
        self.levels.get(&price).map_or(0, |level| level.total_quantity)
    }

    /// Quantity an incoming order on the other side limited at `limit` could
    /// trade against, counting best-first and stopping once `needed` is
    /// reached.
    pub fn crossing_quantity(&self, limit: u64, needed: u64) -> u64 {
        let incoming = self.side.opposite();
        let mut available: u64 = 0;
        for level in self.levels() {
            if !incoming.crosses(limit, level.price) || available >= needed {
                break;
            }
            available = available.saturating_add(level.total_quantity);
        }
        available
    }

    /// Append the node at `key` to the tail of its price's level, creating
    /// the level if needed.
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(price) = slab.get(key).map(OrderNode::price) else {
            debug_assert!(false, "push_back: slab key {key} is vacant");
            return;
        };
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .push_back(key, slab);
        self.order_count += 1;
    }

    /// Unlink the node at `key` from the level at `price`, dropping the level
    /// if it is now empty. Returns the unlinked node's remaining quantity.
    pub fn unlink(&mut self, price: u64, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let Some(level) = self.levels.get_mut(&price) else {
            debug_assert!(false, "unlink: no level at {price}");
            return 0;
        };
        let quantity = level.remove(key, slab);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        self.order_count = self.order_count.saturating_sub(1);
        quantity
    }

    pub fn clear(&mut self) {
        self.levels.clear();
        self.order_count = 0;
    }
}
