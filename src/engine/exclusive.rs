//! Thread-safe front for the matcher.
//!
//! Every call, mutating or not, runs inside one `parking_lot::Mutex`
//! critical section covering the whole operation: from reading best prices
//! to the last locator update. Calls therefore take effect in the order
//! they acquire the lock, and no caller can observe a half-applied match.
//! Acquisition blocks without a timeout.

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::engine::{Matcher, SubmitResult};
use crate::error::EngineError;
use crate::types::{Order, Side};

/// Shared matching engine. Wrap in an `Arc` to use from several threads.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use tickbook::engine::MatchingEngine;
/// use tickbook::types::{Order, Side};
///
/// let engine = Arc::new(MatchingEngine::new());
///
/// let handles: Vec<_> = (0..4u64)
///     .map(|t| {
///         let engine = Arc::clone(&engine);
///         thread::spawn(move || {
///             engine.submit(Order::new(t + 1, Side::Buy, 100, 10)).unwrap();
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(engine.depth_at(Side::Buy, 100), 40);
/// ```
#[derive(Debug, Default)]
pub struct MatchingEngine {
    matcher: Mutex<Matcher>,
}

impl MatchingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self::from_matcher(Matcher::with_config(config))
    }

    pub fn from_matcher(matcher: Matcher) -> Self {
        Self {
            matcher: Mutex::new(matcher),
        }
    }

    pub fn submit(&self, order: Order) -> Result<SubmitResult, EngineError> {
        self.matcher.lock().submit(order)
    }

    pub fn cancel(&self, order_id: u64) -> Result<Order, EngineError> {
        self.matcher.lock().cancel(order_id)
    }

    pub fn best_price(&self, side: Side) -> Option<u64> {
        self.matcher.lock().best_price(side)
    }

    pub fn best_bid(&self) -> Option<u64> {
        self.best_price(Side::Buy)
    }

    pub fn best_ask(&self) -> Option<u64> {
        self.best_price(Side::Sell)
    }

    pub fn depth_at(&self, side: Side, price: u64) -> u64 {
        self.matcher.lock().depth_at(side, price)
    }

    /// Up to `levels` `(price, quantity)` pairs, best first.
    pub fn depth(&self, side: Side, levels: usize) -> Vec<(u64, u64)> {
        self.matcher.lock().book().depth(side, levels)
    }

    pub fn order_count(&self) -> usize {
        self.matcher.lock().book().order_count()
    }

    /// Copy of a resting order.
    pub fn get_order(&self, order_id: u64) -> Option<Order> {
        self.matcher.lock().book().get_order(order_id).cloned()
    }

    pub fn state_root(&self) -> [u8; 32] {
        self.matcher.lock().book().compute_state_root()
    }

    /// Run `f` with the matcher locked, for reads that must see one
    /// consistent book across several queries.
    pub fn with_matcher<R>(&self, f: impl FnOnce(&Matcher) -> R) -> R {
        let matcher = self.matcher.lock();
        f(&*matcher)
    }

    /// Take the matcher back out, e.g. after worker threads have joined.
    pub fn into_inner(self) -> Matcher {
        self.matcher.into_inner()
    }
}
