//! Request and feed message types for the Coinbase Exchange WebSocket feed

use crate::{Channel, Level, ProductId, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Request Types
// ============================================================================

/// Subscribe request message
///
/// The feed expects a single subscribe message naming the products and
/// channels. Channels are either bare names or objects carrying their own
/// product list.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    /// Always "subscribe"
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    /// Products to subscribe to
    pub product_ids: Vec<ProductId>,
    /// Channels to enable
    pub channels: Vec<ChannelSpec>,
}

/// Channel entry in a subscribe request
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ChannelSpec {
    /// Bare channel name, applying to all products in the request
    Name(&'static str),
    /// Channel with an explicit product list
    Scoped {
        /// Channel name
        name: &'static str,
        /// Products this channel applies to
        product_ids: Vec<ProductId>,
    },
}

impl SubscribeRequest {
    /// Create a level-2 subscription for one product
    ///
    /// Requests the level2 book channel plus heartbeat, and a ticker channel
    /// scoped to the same product.
    pub fn level2(product: &ProductId) -> Self {
        Self {
            msg_type: "subscribe",
            product_ids: vec![product.clone()],
            channels: vec![
                ChannelSpec::Name(Channel::Level2.as_str()),
                ChannelSpec::Name(Channel::Heartbeat.as_str()),
                ChannelSpec::Scoped {
                    name: Channel::Ticker.as_str(),
                    product_ids: vec![product.clone()],
                },
            ],
        }
    }
}

// ============================================================================
// Feed Data Types
// ============================================================================

/// Full book state at a point in time, sent once after subscribing
///
/// A side that is entirely absent from the payload decodes as an empty side;
/// the feed contract does not distinguish "missing" from "no resting orders".
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotData {
    /// Product this snapshot belongs to
    pub product_id: ProductId,
    /// All resting bid levels, unordered
    #[serde(default)]
    pub bids: Vec<Level>,
    /// All resting ask levels, unordered
    #[serde(default)]
    pub asks: Vec<Level>,
}

/// Incremental book update, a batch of per-level changes
#[derive(Debug, Clone, Deserialize)]
pub struct L2UpdateData {
    /// Product this update belongs to
    pub product_id: ProductId,
    /// Server timestamp of the update
    #[serde(default)]
    pub time: Option<String>,
    /// Ordered change entries
    pub changes: Vec<RawChange>,
}

/// A change entry as received: `["side", "price", "size"]`
///
/// Entries stay as raw strings at the wire layer so that one malformed
/// triple rejects only itself, not the whole batch (see [`RawChange::parse`]).
#[derive(Debug, Clone, Deserialize)]
pub struct RawChange(pub String, pub String, pub String);

/// A validated change entry ready to apply to the book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookChange {
    /// Which side of the book to touch
    pub side: Side,
    /// Price level to upsert or remove
    pub price: Decimal,
    /// New size; zero means remove the level
    pub size: Decimal,
}

impl RawChange {
    /// Validate this entry into a typed [`BookChange`]
    ///
    /// Rejects unrecognized sides and prices/sizes that are not
    /// non-negative decimals.
    pub fn parse(&self) -> Result<BookChange, EntryError> {
        let side = Side::parse(&self.0)
            .map_err(|s| EntryError::UnknownSide(s.to_string()))?;

        let price = Decimal::from_str(&self.1)
            .map_err(|_| EntryError::InvalidPrice(self.1.clone()))?;
        if price.is_sign_negative() {
            return Err(EntryError::InvalidPrice(self.1.clone()));
        }

        let size = Decimal::from_str(&self.2)
            .map_err(|_| EntryError::InvalidSize(self.2.clone()))?;
        if size.is_sign_negative() {
            return Err(EntryError::InvalidSize(self.2.clone()));
        }

        Ok(BookChange { side, price, size })
    }
}

/// A single update entry that cannot be applied
///
/// These are recoverable: the entry is reported and skipped, the rest of
/// the batch still applies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("unsupported side value: {0:?}")]
    UnknownSide(String),

    #[error("price is not a non-negative decimal: {0:?}")]
    InvalidPrice(String),

    #[error("size is not a non-negative decimal: {0:?}")]
    InvalidSize(String),
}

// ============================================================================
// Raw Message Parsing
// ============================================================================

/// Parsed message from the WebSocket feed
#[derive(Debug, Clone)]
pub enum FeedMessage {
    /// Full book snapshot
    Snapshot(SnapshotData),
    /// Incremental book update
    L2Update(L2UpdateData),
    /// Explicit error from the feed; stream-fatal for the session
    Error {
        /// Human-readable reason from the server
        message: String,
    },
    /// Subscription confirmation
    Subscriptions,
    /// Keepalive
    Heartbeat,
    /// Ticker update (subscribed but not consumed by the book)
    Ticker,
    /// Unknown/unsupported message
    Unknown(serde_json::Value),
}

impl FeedMessage {
    /// Parse a raw JSON message, dispatching on its "type" field
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let msg_type = value.get("type").and_then(|v| v.as_str());

        match msg_type {
            Some("snapshot") => {
                let data: SnapshotData = serde_json::from_value(value)?;
                Ok(Self::Snapshot(data))
            }
            Some("l2update") => {
                let data: L2UpdateData = serde_json::from_value(value)?;
                Ok(Self::L2Update(data))
            }
            Some("error") => {
                let message = value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unspecified error")
                    .to_string();
                Ok(Self::Error { message })
            }
            Some("subscriptions") => Ok(Self::Subscriptions),
            Some("heartbeat") => Ok(Self::Heartbeat),
            Some("ticker") => Ok(Self::Ticker),
            _ => Ok(Self::Unknown(value)),
        }
    }

    /// Check if this is a book snapshot
    pub fn is_snapshot(&self) -> bool {
        matches!(self, Self::Snapshot(_))
    }

    /// Check if this is a book update
    pub fn is_l2update(&self) -> bool {
        matches!(self, Self::L2Update(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_subscribe_request_serialization() {
        let req = SubscribeRequest::level2(&ProductId::new("BTC-GBP"));
        let json = serde_json::to_string(&req).unwrap();

        assert!(json.contains("\"type\":\"subscribe\""));
        assert!(json.contains("\"product_ids\":[\"BTC-GBP\"]"));
        assert!(json.contains("\"level2\""));
        assert!(json.contains("\"heartbeat\""));
        assert!(json.contains("{\"name\":\"ticker\",\"product_ids\":[\"BTC-GBP\"]}"));
    }

    #[test]
    fn test_parse_snapshot() {
        let json = r#"{
            "type": "snapshot",
            "product_id": "BTC-USD",
            "bids": [["10101.10", "0.45054140"]],
            "asks": [["10102.55", "0.57753524"], ["10102.56", "4.5"]]
        }"#;

        let msg = FeedMessage::parse(json).unwrap();
        assert!(msg.is_snapshot());

        match msg {
            FeedMessage::Snapshot(data) => {
                assert_eq!(data.product_id.as_str(), "BTC-USD");
                assert_eq!(data.bids.len(), 1);
                assert_eq!(data.asks.len(), 2);
                assert_eq!(data.asks[0].price, dec!(10102.55));
            }
            _ => panic!("Expected Snapshot message"),
        }
    }

    #[test]
    fn test_parse_snapshot_missing_side() {
        // An absent side is a legitimate empty book, not a decode failure
        let json = r#"{
            "type": "snapshot",
            "product_id": "BTC-USD",
            "asks": [["10102.55", "1"]]
        }"#;

        match FeedMessage::parse(json).unwrap() {
            FeedMessage::Snapshot(data) => {
                assert!(data.bids.is_empty());
                assert_eq!(data.asks.len(), 1);
            }
            _ => panic!("Expected Snapshot message"),
        }
    }

    #[test]
    fn test_parse_l2update() {
        let json = r#"{
            "type": "l2update",
            "product_id": "BTC-USD",
            "time": "2019-08-14T20:42:27.265Z",
            "changes": [
                ["buy", "10101.80000000", "0.162567"],
                ["sell", "10102.55", "0"]
            ]
        }"#;

        let msg = FeedMessage::parse(json).unwrap();
        assert!(msg.is_l2update());

        match msg {
            FeedMessage::L2Update(data) => {
                assert_eq!(data.changes.len(), 2);
                let first = data.changes[0].parse().unwrap();
                assert_eq!(first.side, Side::Buy);
                assert_eq!(first.price, dec!(10101.8));
                let second = data.changes[1].parse().unwrap();
                assert_eq!(second.side, Side::Sell);
                assert!(second.size.is_zero());
            }
            _ => panic!("Expected L2Update message"),
        }
    }

    #[test]
    fn test_parse_error_message() {
        let json = r#"{"type": "error", "message": "Failed to subscribe"}"#;
        match FeedMessage::parse(json).unwrap() {
            FeedMessage::Error { message } => assert_eq!(message, "Failed to subscribe"),
            _ => panic!("Expected Error message"),
        }
    }

    #[test]
    fn test_parse_unknown_message() {
        let json = r#"{"type": "status", "products": []}"#;
        assert!(matches!(
            FeedMessage::parse(json).unwrap(),
            FeedMessage::Unknown(_)
        ));
    }

    #[test]
    fn test_raw_change_rejects_unknown_side() {
        let change = RawChange("hold".into(), "100.0".into(), "1".into());
        assert_eq!(
            change.parse(),
            Err(EntryError::UnknownSide("hold".to_string()))
        );
    }

    #[test]
    fn test_raw_change_rejects_bad_decimals() {
        let change = RawChange("buy".into(), "NaN".into(), "1".into());
        assert!(matches!(change.parse(), Err(EntryError::InvalidPrice(_))));

        let change = RawChange("buy".into(), "100.0".into(), "-1".into());
        assert!(matches!(change.parse(), Err(EntryError::InvalidSize(_))));

        let change = RawChange("sell".into(), "-100.0".into(), "1".into());
        assert!(matches!(change.parse(), Err(EntryError::InvalidPrice(_))));
    }
}
