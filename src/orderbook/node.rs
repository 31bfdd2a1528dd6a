//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers so a level
//! can unlink any order in O(1) given its slab key.
//!
//! The pointers are slab keys (`usize`), never references. A key stays valid
//! until its node is removed from the slab, and nothing reads a key after
//! that: the level, the locator and the slab entry are dropped together.
//!
//! ## Linked List
//!
//! - `next`: the next newer order at the same price
//! - `prev`: the next older order at the same price

use crate::types::Order;

/// Order node stored in the slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The resting order
    pub order: Order,

    /// Next (newer) order in the level queue; None at the tail
    pub next: Option<usize>,

    /// Previous (older) order in the level queue; None at the head
    pub prev: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked node.
    ///
    /// ```
    /// use tickbook::orderbook::OrderNode;
    /// use tickbook::types::{Order, Side};
    ///
    /// let node = OrderNode::new(Order::new(1, Side::Buy, 100, 10));
    /// assert!(node.is_unlinked());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
        }
    }

    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }

    /// Fill up to `quantity`, returning the amount actually filled.
    #[inline]
    pub fn fill(&mut self, quantity: u64) -> u64 {
        self.order.fill(quantity)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.order.is_filled()
    }
}
