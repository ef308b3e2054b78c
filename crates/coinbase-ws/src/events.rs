//! Connection and market data events

use coinbase_book::BookView;
use coinbase_types::ProductId;
use std::time::Duration;

/// Reason for disconnection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Server closed the connection
    ServerClosed,
    /// Network error occurred
    NetworkError(String),
    /// Client requested shutdown
    Shutdown,
}

/// Connection lifecycle events
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// Connected and subscribed
    Connected {
        /// Endpoint URL
        endpoint: String,
    },
    /// Connection was lost
    Disconnected {
        /// Reason for disconnection
        reason: DisconnectReason,
    },
    /// Attempting to reconnect
    Reconnecting {
        /// Current attempt number (1-indexed)
        attempt: u32,
        /// Delay before this attempt
        delay: Duration,
    },
    /// Reconnection attempts exhausted
    ReconnectFailed {
        /// Final error
        error: String,
    },
}

/// Market data events
#[derive(Debug, Clone)]
pub enum MarketEvent {
    /// Book bootstrapped from a snapshot
    BookSnapshot {
        /// Product the book tracks
        product_id: ProductId,
        /// Full book state after the snapshot
        view: BookView,
    },
    /// Book updated by a delta batch
    BookUpdate {
        /// Product the book tracks
        product_id: ProductId,
        /// Full book state after the batch
        view: BookView,
    },
    /// Heartbeat received from the feed
    Heartbeat,
}

/// Combined event type for the consumer stream
#[derive(Debug, Clone)]
pub enum Event {
    /// Connection-related event
    Connection(ConnectionEvent),
    /// Market data event
    Market(MarketEvent),
}

impl From<ConnectionEvent> for Event {
    fn from(event: ConnectionEvent) -> Self {
        Event::Connection(event)
    }
}

impl From<MarketEvent> for Event {
    fn from(event: MarketEvent) -> Self {
        Event::Market(event)
    }
}
