//! BTreeMap-based price ladder storage
//!
//! Keys are `Decimal` prices, so both sides are always held in price order:
//! iterating asks yields the N lowest, iterating bids (stored under
//! `Reverse<Decimal>`) yields the N highest. Upsert and remove are O(log M)
//! in the number of levels on the side, and a depth-N query is O(N) off the
//! front of the map; nothing ever re-sorts.

use coinbase_types::Level;
use rust_decimal::Decimal;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Two-sided price ladder mapping price to aggregated size
///
/// Invariant: every stored size is strictly positive. A zero size passed to
/// an upsert removes the level instead of storing it.
#[derive(Debug, Clone, Default)]
pub struct Ladder {
    /// Bids: highest price first (Reverse key for descending order)
    bids: BTreeMap<Reverse<Decimal>, Decimal>,
    /// Asks: lowest price first (natural ascending order)
    asks: BTreeMap<Decimal, Decimal>,
}

impl Ladder {
    /// Create an empty ladder
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, overwrite, or (on zero size) remove a bid level
    pub fn upsert_bid(&mut self, price: Decimal, size: Decimal) {
        if size.is_zero() {
            self.bids.remove(&Reverse(price));
        } else {
            self.bids.insert(Reverse(price), size);
        }
    }

    /// Insert, overwrite, or (on zero size) remove an ask level
    pub fn upsert_ask(&mut self, price: Decimal, size: Decimal) {
        if size.is_zero() {
            self.asks.remove(&price);
        } else {
            self.asks.insert(price, size);
        }
    }

    /// Remove a bid level; absence is not an error
    pub fn remove_bid(&mut self, price: &Decimal) {
        self.bids.remove(&Reverse(*price));
    }

    /// Remove an ask level; absence is not an error
    pub fn remove_ask(&mut self, price: &Decimal) {
        self.asks.remove(price);
    }

    /// Get the best (highest) bid
    pub fn best_bid(&self) -> Option<Level> {
        self.bids
            .iter()
            .next()
            .map(|(Reverse(price), size)| Level::new(*price, *size))
    }

    /// Get the best (lowest) ask
    pub fn best_ask(&self) -> Option<Level> {
        self.asks
            .iter()
            .next()
            .map(|(price, size)| Level::new(*price, *size))
    }

    /// Iterator over bids, highest price first
    pub fn bids(&self) -> impl Iterator<Item = Level> + '_ {
        self.bids
            .iter()
            .map(|(Reverse(price), size)| Level::new(*price, *size))
    }

    /// Iterator over asks, lowest price first
    pub fn asks(&self) -> impl Iterator<Item = Level> + '_ {
        self.asks
            .iter()
            .map(|(price, size)| Level::new(*price, *size))
    }

    /// Get the top N bids, highest first
    pub fn top_bids(&self, n: usize) -> Vec<Level> {
        self.bids().take(n).collect()
    }

    /// Get the top N asks, lowest first
    pub fn top_asks(&self, n: usize) -> Vec<Level> {
        self.asks().take(n).collect()
    }

    /// Number of bid levels
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    /// Number of ask levels
    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    /// Check if both sides are empty
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Clear all levels
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }
}
