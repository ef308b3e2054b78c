//! Orderbook state machine
//!
//! Owns the two-sided book for one product and mutates it from feed
//! messages: a snapshot replaces all state, an l2update applies per-level
//! deltas in order. Reads never mutate.
//!
//! # State Machine
//!
//! ```text
//! AwaitingSnapshot → Live
//! ```
//!
//! Deltas that arrive before the first snapshot are ignored: they are
//! relative to a state the book does not have yet.

use crate::storage::Ladder;
use coinbase_types::{L2UpdateData, Level, ProductId, Side, SnapshotData};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// Book synchronization state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookState {
    /// No snapshot applied yet; deltas are ignored
    #[default]
    AwaitingSnapshot,
    /// Snapshot applied, deltas are being processed
    Live,
}

/// Result of applying a feed message to the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    /// Snapshot replaced the book
    Snapshot,
    /// Delta batch was applied
    Update {
        /// Entries applied
        applied: usize,
        /// Malformed entries reported and skipped
        rejected: usize,
    },
    /// Message was ignored (delta before snapshot)
    Ignored,
}

/// Level-2 orderbook for a single product
///
/// Single-writer: one message stream drives all mutations in arrival order.
/// Callers sharing the book across threads wrap it in a lock so a reader
/// never observes a half-applied batch.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Product this book tracks
    product_id: ProductId,
    /// Price level storage
    ladder: Ladder,
    /// Current synchronization state
    state: BookState,
}

impl OrderBook {
    /// Create an empty book awaiting its first snapshot
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            ladder: Ladder::new(),
            state: BookState::AwaitingSnapshot,
        }
    }

    /// Bootstrap a book directly from a snapshot
    pub fn from_snapshot(snapshot: &SnapshotData) -> Self {
        let mut book = Self::new(snapshot.product_id.clone());
        book.apply_snapshot(snapshot);
        book
    }

    /// Get the product id
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Get the current state
    pub fn state(&self) -> BookState {
        self.state
    }

    /// Check if the book has been bootstrapped
    pub fn is_live(&self) -> bool {
        self.state == BookState::Live
    }

    /// Get the best bid
    pub fn best_bid(&self) -> Option<Level> {
        self.ladder.best_bid()
    }

    /// Get the best ask
    pub fn best_ask(&self) -> Option<Level> {
        self.ladder.best_ask()
    }

    /// Get the spread (ask - bid)
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some(ask.price - bid.price),
            _ => None,
        }
    }

    /// Get the mid price ((ask + bid) / 2)
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => Some((ask.price + bid.price) / Decimal::TWO),
            _ => None,
        }
    }

    /// Number of bid levels
    pub fn bid_count(&self) -> usize {
        self.ladder.bid_count()
    }

    /// Number of ask levels
    pub fn ask_count(&self) -> usize {
        self.ladder.ask_count()
    }

    /// Replace the entire book with a snapshot
    ///
    /// Entries with zero or negative size are dropped rather than stored:
    /// a snapshot should not legally contain them, but the positive-size
    /// invariant is enforced here regardless.
    pub fn apply_snapshot(&mut self, snapshot: &SnapshotData) -> ApplyResult {
        self.ladder.clear();

        for level in &snapshot.bids {
            if Self::snapshot_level_ok(level, Side::Buy) {
                self.ladder.upsert_bid(level.price, level.size);
            }
        }
        for level in &snapshot.asks {
            if Self::snapshot_level_ok(level, Side::Sell) {
                self.ladder.upsert_ask(level.price, level.size);
            }
        }

        self.state = BookState::Live;
        ApplyResult::Snapshot
    }

    fn snapshot_level_ok(level: &Level, side: Side) -> bool {
        if level.size <= Decimal::ZERO || level.price.is_sign_negative() {
            debug!(
                side = side.as_str(),
                price = %level.price,
                size = %level.size,
                "dropping non-positive snapshot level"
            );
            return false;
        }
        true
    }

    /// Apply a delta batch, entry by entry, in sequence order
    ///
    /// A size of zero removes the level (absence is a no-op); any other size
    /// overwrites it, so the last entry for a price within the batch wins.
    /// Malformed entries are warned about and skipped without touching the
    /// book; the rest of the batch still applies.
    pub fn apply_update(&mut self, update: &L2UpdateData) -> ApplyResult {
        if self.state != BookState::Live {
            debug!(product = %self.product_id, "ignoring delta before snapshot");
            return ApplyResult::Ignored;
        }

        let mut applied = 0usize;
        let mut rejected = 0usize;

        for raw in &update.changes {
            match raw.parse() {
                Ok(change) => {
                    match change.side {
                        Side::Buy => self.ladder.upsert_bid(change.price, change.size),
                        Side::Sell => self.ladder.upsert_ask(change.price, change.size),
                    }
                    applied += 1;
                }
                Err(e) => {
                    warn!(product = %self.product_id, error = %e, "skipping update entry");
                    rejected += 1;
                }
            }
        }

        ApplyResult::Update { applied, rejected }
    }

    /// Best-N levels per side: asks ascending, bids descending
    ///
    /// Each side is truncated to at most `depth` levels; a shallow side
    /// returns fewer. Read-only.
    pub fn top_levels(&self, depth: usize) -> DepthView {
        DepthView {
            asks: self.ladder.top_asks(depth),
            bids: self.ladder.top_bids(depth),
        }
    }

    /// Capture the full book as an immutable view
    pub fn view(&self) -> BookView {
        BookView {
            product_id: self.product_id.clone(),
            bids: self.ladder.bids().collect(),
            asks: self.ladder.asks().collect(),
        }
    }

    /// Clear all levels and await a fresh snapshot
    pub fn reset(&mut self) {
        self.ladder.clear();
        self.state = BookState::AwaitingSnapshot;
    }
}

/// Bounded-depth answer to a [`OrderBook::top_levels`] query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthView {
    /// Up to N asks, lowest price first
    pub asks: Vec<Level>,
    /// Up to N bids, highest price first
    pub bids: Vec<Level>,
}

/// Immutable capture of the full book state
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    /// Product this view belongs to
    pub product_id: ProductId,
    /// Bid levels, highest price first
    pub bids: Vec<Level>,
    /// Ask levels, lowest price first
    pub asks: Vec<Level>,
}

impl BookView {
    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get the best ask price
    pub fn best_ask_price(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    /// Get the spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get the mid price
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_ask_price(), self.best_bid_price()) {
            (Some(ask), Some(bid)) => Some((ask + bid) / Decimal::TWO),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbase_types::RawChange;
    use rust_decimal_macros::dec;

    fn snapshot(bids: Vec<(f64, f64)>, asks: Vec<(f64, f64)>) -> SnapshotData {
        use rust_decimal::prelude::FromPrimitive;
        let level = |(p, s): (f64, f64)| {
            Level::new(
                Decimal::from_f64(p).unwrap_or_default(),
                Decimal::from_f64(s).unwrap_or_default(),
            )
        };
        SnapshotData {
            product_id: "BTC-USD".into(),
            bids: bids.into_iter().map(level).collect(),
            asks: asks.into_iter().map(level).collect(),
        }
    }

    fn update(changes: Vec<(&str, &str, &str)>) -> L2UpdateData {
        L2UpdateData {
            product_id: "BTC-USD".into(),
            time: None,
            changes: changes
                .into_iter()
                .map(|(side, price, size)| {
                    RawChange(side.to_string(), price.to_string(), size.to_string())
                })
                .collect(),
        }
    }

    #[test]
    fn test_bootstrap_and_depth_one() {
        // The README scenario: two levels per side, query depth 1
        let book = OrderBook::from_snapshot(&snapshot(
            vec![(100.0, 5.0), (99.5, 1.0)],
            vec![(100.5, 2.0), (101.0, 3.0)],
        ));
        assert!(book.is_live());

        let top = book.top_levels(1);
        assert_eq!(top.asks, vec![Level::new(dec!(100.5), dec!(2))]);
        assert_eq!(top.bids, vec![Level::new(dec!(100.0), dec!(5))]);
    }

    #[test]
    fn test_remove_then_reinsert_scenario() {
        let mut book = OrderBook::from_snapshot(&snapshot(
            vec![(100.0, 5.0), (99.5, 1.0)],
            vec![(100.5, 2.0), (101.0, 3.0)],
        ));

        book.apply_update(&update(vec![
            ("sell", "100.5", "0"),
            ("buy", "99.5", "4"),
        ]));

        let top = book.top_levels(2);
        assert_eq!(top.asks, vec![Level::new(dec!(101.0), dec!(3))]);
        assert_eq!(
            top.bids,
            vec![
                Level::new(dec!(100.0), dec!(5)),
                Level::new(dec!(99.5), dec!(4)),
            ]
        );
    }

    #[test]
    fn test_depth_view_sorted_and_truncated() {
        let mut book = OrderBook::new("BTC-USD".into());
        let mut bids = Vec::new();
        let mut asks = Vec::new();
        // Insert out of order
        for i in [7, 2, 9, 4, 1, 8, 3] {
            bids.push((100.0 - i as f64, 1.0));
            asks.push((100.0 + i as f64, 1.0));
        }
        book.apply_snapshot(&snapshot(bids, asks));

        let top = book.top_levels(5);
        assert_eq!(top.asks.len(), 5);
        assert_eq!(top.bids.len(), 5);
        assert!(top.asks.windows(2).all(|w| w[0].price < w[1].price));
        assert!(top.bids.windows(2).all(|w| w[0].price > w[1].price));

        // Shallow side returns fewer than requested
        let all = book.top_levels(50);
        assert_eq!(all.asks.len(), 7);
        assert_eq!(all.bids.len(), 7);
    }

    #[test]
    fn test_zero_size_removes_and_absent_is_noop() {
        let mut book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 5.0)], vec![(101.0, 1.0)]));

        let result = book.apply_update(&update(vec![
            ("buy", "100.0", "0"),
            ("buy", "98.0", "0"), // not in the book
        ]));
        assert_eq!(result, ApplyResult::Update { applied: 2, rejected: 0 });
        assert_eq!(book.bid_count(), 0);
    }

    #[test]
    fn test_overwrite_replaces_size() {
        let mut book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 5.0)], vec![(101.0, 1.0)]));

        book.apply_update(&update(vec![("buy", "100.0", "7")]));

        // Replacement, not accumulation
        assert_eq!(book.best_bid().unwrap().size, dec!(7));
        assert_eq!(book.bid_count(), 1);
    }

    #[test]
    fn test_batch_last_write_wins() {
        let mut book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 5.0)], vec![(101.0, 1.0)]));

        book.apply_update(&update(vec![
            ("buy", "100.0", "2"),
            ("buy", "100.0", "9"),
        ]));
        assert_eq!(book.best_bid().unwrap().size, dec!(9));

        book.apply_update(&update(vec![
            ("sell", "101.0", "4"),
            ("sell", "101.0", "0"),
        ]));
        assert_eq!(book.ask_count(), 0);
    }

    #[test]
    fn test_snapshot_replaces_prior_state() {
        let mut book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 5.0)], vec![(101.0, 1.0)]));
        book.apply_update(&update(vec![("buy", "99.0", "2")]));

        // Zero-size snapshot entries are dropped, not stored
        book.apply_snapshot(&snapshot(
            vec![(200.0, 1.0), (199.0, 0.0)],
            vec![(201.0, 2.0)],
        ));

        let view = book.view();
        assert_eq!(view.bids, vec![Level::new(dec!(200.0), dec!(1))]);
        assert_eq!(view.asks, vec![Level::new(dec!(201.0), dec!(2))]);
    }

    #[test]
    fn test_invalid_entry_skipped_valid_applied() {
        let mut book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 5.0)], vec![(101.0, 1.0)]));

        let result = book.apply_update(&update(vec![
            ("buy", "NaN", "1"),
            ("buy", "100.0", "7"),
            ("hold", "100.0", "1"),
        ]));
        assert_eq!(result, ApplyResult::Update { applied: 1, rejected: 2 });

        let top = book.top_levels(1);
        assert_eq!(top.bids, vec![Level::new(dec!(100.0), dec!(7))]);
    }

    #[test]
    fn test_all_sizes_positive_after_mixed_traffic() {
        let mut book = OrderBook::from_snapshot(&snapshot(
            vec![(100.0, 5.0), (99.0, 0.0)],
            vec![(101.0, 1.0)],
        ));
        book.apply_update(&update(vec![
            ("buy", "98.0", "3"),
            ("buy", "98.0", "0"),
            ("sell", "102.0", "1.5"),
            ("sell", "103.0", "-2"), // rejected
        ]));

        let view = book.view();
        assert!(view.bids.iter().all(|l| l.size > Decimal::ZERO));
        assert!(view.asks.iter().all(|l| l.size > Decimal::ZERO));
    }

    #[test]
    fn test_delta_before_snapshot_ignored() {
        let mut book = OrderBook::new("BTC-USD".into());
        let result = book.apply_update(&update(vec![("buy", "100.0", "1")]));
        assert_eq!(result, ApplyResult::Ignored);
        assert_eq!(book.bid_count(), 0);
        assert!(!book.is_live());
    }

    #[test]
    fn test_empty_side_snapshot_is_legitimate() {
        let book = OrderBook::from_snapshot(&snapshot(vec![], vec![(101.0, 1.0)]));
        assert!(book.is_live());
        assert_eq!(book.bid_count(), 0);
        assert!(book.best_bid().is_none());
        assert!(book.spread().is_none());
    }

    #[test]
    fn test_spread_and_mid() {
        let book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 1.0)], vec![(102.0, 1.0)]));
        assert_eq!(book.spread(), Some(dec!(2)));
        assert_eq!(book.mid_price(), Some(dec!(101)));
    }

    #[test]
    fn test_reset() {
        let mut book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 1.0)], vec![(101.0, 1.0)]));
        book.reset();

        assert_eq!(book.state(), BookState::AwaitingSnapshot);
        assert_eq!(book.bid_count(), 0);
        assert_eq!(book.ask_count(), 0);
    }

    #[test]
    fn test_view_helpers() {
        let book =
            OrderBook::from_snapshot(&snapshot(vec![(100.0, 1.0)], vec![(102.0, 1.0)]));
        let view = book.view();

        assert_eq!(view.best_bid_price(), Some(dec!(100)));
        assert_eq!(view.best_ask_price(), Some(dec!(102)));
        assert_eq!(view.spread(), Some(dec!(2)));
        assert_eq!(view.mid_price(), Some(dec!(101)));
    }
}
