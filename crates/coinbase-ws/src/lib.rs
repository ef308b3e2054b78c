//! WebSocket client for the Coinbase Exchange level-2 feed
//!
//! Connects to the feed, subscribes to the level2 channel for one product,
//! and maintains the orderbook from `coinbase-book` as snapshots and deltas
//! arrive.
//!
//! # Features
//!
//! - Automatic reconnection with exponential backoff
//! - Typed message decoding (no dynamic JSON traversal)
//! - Coarse-locked book shared between the feed task and readers
//! - Event stream for snapshots, updates, and connection lifecycle
//!
//! # Example
//!
//! ```no_run
//! use coinbase_ws::{Event, FeedConfig, FeedConnection, MarketEvent};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let conn = Arc::new(FeedConnection::new(FeedConfig::new("BTC-USD".into())));
//!     let mut events = conn.take_event_receiver().unwrap();
//!
//!     let feed = Arc::clone(&conn);
//!     tokio::spawn(async move { feed.connect_and_run().await });
//!
//!     while let Some(event) = events.recv().await {
//!         if let Event::Market(MarketEvent::BookUpdate { view, .. }) = event {
//!             println!("best bid: {:?}", view.best_bid_price());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod endpoint;
pub mod events;
pub mod reconnect;

// Re-export main types
pub use connection::{ConnectionState, FeedConfig, FeedConnection};
pub use endpoint::Endpoint;
pub use events::{ConnectionEvent, DisconnectReason, Event, MarketEvent};
pub use reconnect::ReconnectConfig;
