//! Level-2 orderbook engine for the Coinbase Exchange feed
//!
//! This crate owns the book state machine: bootstrap from a snapshot,
//! incremental delta application, and bounded-depth queries. It has no
//! networking dependencies; the `coinbase-ws` crate feeds it.
//!
//! # Example
//!
//! ```
//! use coinbase_book::{BookState, OrderBook};
//!
//! let book = OrderBook::new("BTC-USD".into());
//! assert_eq!(book.state(), BookState::AwaitingSnapshot);
//! ```

pub mod orderbook;
pub mod storage;

// Re-export main types
pub use orderbook::{ApplyResult, BookState, BookView, DepthView, OrderBook};
pub use storage::Ladder;
