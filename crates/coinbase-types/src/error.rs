//! Error types for the feed client

use std::time::Duration;
use thiserror::Error;

/// Main error type for feed operations
#[derive(Error, Debug)]
pub enum FeedError {
    // === Connection Errors ===
    /// Failed to establish WebSocket connection
    #[error("Failed to connect to {url}: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection attempt timed out
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    /// WebSocket protocol error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    // === Protocol Errors ===
    /// Failed to serialize or parse a JSON message
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String, raw: Option<String> },

    /// Explicit error message from the feed; the session cannot continue
    #[error("Feed error message received: {message}")]
    StreamError { message: String },

    // === Internal Errors ===
    /// Internal channel was closed unexpectedly
    #[error("Internal channel closed unexpectedly")]
    ChannelClosed,

    /// Client is shutting down
    #[error("Shutdown in progress")]
    ShuttingDown,
}

impl FeedError {
    /// Returns true if this error is worth retrying via reconnect
    ///
    /// A [`FeedError::StreamError`] is not: the server rejected the session
    /// itself (bad product, bad subscribe payload), so retrying the same
    /// session would fail the same way. The host decides what to do next.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. } | Self::WebSocket(_)
        )
    }

    /// Returns true if this error means the connection is gone
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::WebSocket(_) | Self::ConnectionFailed { .. } | Self::ChannelClosed
        )
    }
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
