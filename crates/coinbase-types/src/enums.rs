//! Side and Channel enums

use serde::{Deserialize, Serialize};

/// Order side as sent in l2update change entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order, aggregated into the bid side of the book
    Buy,
    /// Sell order, aggregated into the ask side of the book
    Sell,
}

impl Side {
    /// Parse a raw side string from the feed
    ///
    /// Returns the original string on failure so the caller can report it.
    pub fn parse(s: &str) -> Result<Self, &str> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(other),
        }
    }

    /// Returns the side name as used in feed messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// WebSocket channel types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Channel {
    /// Level 2 channel - aggregated orderbook snapshot plus deltas
    Level2,
    /// Heartbeat channel - keepalive messages
    Heartbeat,
    /// Ticker channel - price and volume updates
    Ticker,
}

impl Channel {
    /// Returns the channel name as used in subscribe messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level2 => "level2",
            Self::Heartbeat => "heartbeat",
            Self::Ticker => "ticker",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serde() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        let parsed: Side = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(parsed, Side::Sell);
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("buy"), Ok(Side::Buy));
        assert_eq!(Side::parse("sell"), Ok(Side::Sell));
        assert_eq!(Side::parse("hold"), Err("hold"));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_channel_serde() {
        assert_eq!(serde_json::to_string(&Channel::Level2).unwrap(), "\"level2\"");
        let parsed: Channel = serde_json::from_str("\"heartbeat\"").unwrap();
        assert_eq!(parsed, Channel::Heartbeat);
    }
}
