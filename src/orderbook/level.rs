//! Price level: the FIFO queue of resting orders at one price.
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Matching consumes orders from the head
//! - Any order can be unlinked in O(1) using its slab key
//!
//! The order data lives in the slab; a `PriceLevel` only holds queue
//! metadata. Because admission sequences are stamped in submission order and
//! orders are only ever appended, the queue is always sorted by sequence.

use slab::Slab;

use crate::orderbook::OrderNode;
use crate::types::Order;

/// A price level containing orders at a single price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLevel {
    /// Price for this level, in ticks
    pub price: u64,

    /// Sum of `remaining` over every order in the queue
    pub total_quantity: u64,

    /// Oldest order (slab key), first to match
    pub head: Option<usize>,

    /// Newest order (slab key)
    pub tail: Option<usize>,

    /// Number of orders in the queue
    pub order_count: usize,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        Self {
            price,
            total_quantity: 0,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Append the node at `key` to the tail of the queue.
    ///
    /// `key` must refer to an unlinked node in `slab`.
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let Some(node) = slab.get_mut(key) else {
            debug_assert!(false, "push_back: slab key {key} is vacant");
            return;
        };
        let quantity = node.remaining();

        node.prev = self.tail;
        node.next = None;

        match self.tail.and_then(|tail_key| slab.get_mut(tail_key)) {
            Some(tail_node) => tail_node.next = Some(key),
            None => self.head = Some(key),
        }

        self.tail = Some(key);
        self.order_count += 1;
        self.total_quantity = self.total_quantity.saturating_add(quantity);
    }

    /// Unlink the node at `key` from the queue.
    ///
    /// The node stays in the slab; the caller owns freeing it. Returns the
    /// node's remaining quantity, which is no longer counted in
    /// `total_quantity`.
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) -> u64 {
        let Some(node) = slab.get_mut(key) else {
            debug_assert!(false, "remove: slab key {key} is vacant");
            return 0;
        };
        let quantity = node.remaining();
        let prev_key = node.prev.take();
        let next_key = node.next.take();

        match prev_key.and_then(|prev| slab.get_mut(prev)) {
            Some(prev_node) => prev_node.next = next_key,
            None => self.head = next_key,
        }

        match next_key.and_then(|next| slab.get_mut(next)) {
            Some(next_node) => next_node.prev = prev_key,
            None => self.tail = prev_key,
        }

        self.order_count -= 1;
        self.total_quantity = self.total_quantity.saturating_sub(quantity);

        quantity
    }

    /// Slab key of the oldest order.
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Account for a partial fill of one of this level's orders.
    pub fn reduce_quantity(&mut self, filled_quantity: u64) {
        self.total_quantity = self.total_quantity.saturating_sub(filled_quantity);
    }

    /// Walk the queue oldest-first.
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }
}

/// FIFO iterator over a level's orders.
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a Order;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.slab.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.order)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn create_test_node(slab: &mut Slab<OrderNode>, id: u64, quantity: u64) -> usize {
        let order = Order::new(id, Side::Buy, 100, quantity);
        slab.insert(OrderNode::new(order))
    }

    fn ids(level: &PriceLevel, slab: &Slab<OrderNode>) -> Vec<u64> {
        level.iter(slab).map(|o| o.id).collect()
    }

    #[test]
    fn test_price_level_new() {
        let level = PriceLevel::new(100);

        assert_eq!(level.price, 100);
        assert_eq!(level.total_quantity, 0);
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
        assert!(level.is_empty());
    }

    #[test]
    fn test_price_level_push_multiple() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(100);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 20);
        let key3 = create_test_node(&mut slab, 3, 30);

        level.push_back(key1, &mut slab);
        level.push_back(key2, &mut slab);
        level.push_back(key3, &mut slab);

        assert_eq!(level.order_count, 3);
        assert_eq!(level.total_quantity, 60);
        assert_eq!(level.head, Some(key1));
        assert_eq!(level.tail, Some(key3));
        assert_eq!(ids(&level, &slab), vec![1, 2, 3]);

        assert_eq!(slab[key2].prev, Some(key1));
        assert_eq!(slab[key2].next, Some(key3));
    }

    #[test]
    fn test_price_level_remove_middle() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(100);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 20);
        let key3 = create_test_node(&mut slab, 3, 30);
        for key in [key1, key2, key3] {
            level.push_back(key, &mut slab);
        }

        assert_eq!(level.remove(key2, &mut slab), 20);

        assert_eq!(level.order_count, 2);
        assert_eq!(level.total_quantity, 40);
        assert_eq!(ids(&level, &slab), vec![1, 3]);
        assert!(slab[key2].is_unlinked());
        assert_eq!(slab[key3].prev, Some(key1));
    }

    #[test]
    fn test_price_level_remove_head_then_tail() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(100);

        let key1 = create_test_node(&mut slab, 1, 10);
        let key2 = create_test_node(&mut slab, 2, 20);
        level.push_back(key1, &mut slab);
        level.push_back(key2, &mut slab);

        level.remove(key1, &mut slab);
        assert_eq!(level.head, Some(key2));
        assert_eq!(level.tail, Some(key2));
        assert!(slab[key2].is_unlinked());

        level.remove(key2, &mut slab);
        assert!(level.is_empty());
        assert_eq!(level.total_quantity, 0);
        assert!(level.head.is_none());
        assert!(level.tail.is_none());
    }

    #[test]
    fn test_price_level_reduce_quantity() {
        let mut level = PriceLevel::new(100);
        level.total_quantity = 100;

        level.reduce_quantity(30);
        assert_eq!(level.total_quantity, 70);

        level.reduce_quantity(100);
        assert_eq!(level.total_quantity, 0);
    }

    #[test]
    fn test_price_level_reuses_freed_keys() {
        let mut slab = Slab::with_capacity(10);
        let mut level = PriceLevel::new(100);

        let key1 = create_test_node(&mut slab, 1, 10);
        level.push_back(key1, &mut slab);
        level.remove(key1, &mut slab);
        slab.remove(key1);

        // The slab hands the same slot back; the level must not confuse it
        // with the order that used to live there.
        let key2 = create_test_node(&mut slab, 2, 5);
        assert_eq!(key1, key2);
        level.push_back(key2, &mut slab);

        assert_eq!(ids(&level, &slab), vec![2]);
        assert_eq!(level.total_quantity, 5);
    }
}
