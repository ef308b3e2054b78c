//! WebSocket endpoint definitions

use std::fmt;

/// Coinbase Exchange WebSocket feed endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// Production market data (default)
    #[default]
    Production,
    /// Public sandbox for testing
    Sandbox,
}

impl Endpoint {
    /// Get the WebSocket URL for this endpoint
    pub fn url(&self) -> &'static str {
        match self {
            Self::Production => "wss://ws-feed.exchange.coinbase.com",
            Self::Sandbox => "wss://ws-feed-public.sandbox.exchange.coinbase.com",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}
