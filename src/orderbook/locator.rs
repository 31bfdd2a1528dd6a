//! Order id -> location index.
//!
//! A pure index over the side books. An entry exists exactly while the order
//! rests: it is inserted when the order is rested and removed when the order
//! is fully filled or cancelled. The slab key it stores is only dereferenced
//! while the entry exists.

use std::collections::HashMap;

use crate::types::Side;

/// Where a resting order lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub side: Side,
    /// Level price in ticks
    pub price: u64,
    /// Slab key of the order node
    pub key: usize,
}

/// Id to location lookup for O(1) cancel.
#[derive(Debug, Clone, Default)]
pub struct OrderLocator {
    entries: HashMap<u64, Location>,
}

impl OrderLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Index a newly rested order. Returns the previous entry if the id was
    /// already present, which the book treats as a bug.
    pub fn insert(&mut self, order_id: u64, location: Location) -> Option<Location> {
        self.entries.insert(order_id, location)
    }

    #[inline]
    pub fn locate(&self, order_id: u64) -> Option<Location> {
        self.entries.get(&order_id).copied()
    }

    pub fn remove(&mut self, order_id: u64) -> Option<Location> {
        self.entries.remove(&order_id)
    }

    #[inline]
    pub fn contains(&self, order_id: u64) -> bool {
        self.entries.contains_key(&order_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
