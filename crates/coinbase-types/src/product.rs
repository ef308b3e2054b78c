//! Product identifiers (BTC-USD format)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading pair identifier in Coinbase's BASE-QUOTE format
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// BTC-USD trading pair
    pub const BTC_USD: &'static str = "BTC-USD";
    /// ETH-USD trading pair
    pub const ETH_USD: &'static str = "ETH-USD";
    /// BTC-GBP trading pair
    pub const BTC_GBP: &'static str = "BTC-GBP";

    /// Create a new product id from a string
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the product id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the base currency (e.g., "BTC" from "BTC-USD")
    pub fn base(&self) -> Option<&str> {
        self.0.split('-').next()
    }

    /// Get the quote currency (e.g., "USD" from "BTC-USD")
    pub fn quote(&self) -> Option<&str> {
        self.0.split('-').nth(1)
    }
}

impl FromStr for ProductId {
    type Err = ProductIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Validate format: BASE-QUOTE
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 2 {
            return Err(ProductIdParseError::InvalidFormat(s.to_string()));
        }

        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(ProductIdParseError::EmptyPart(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Error parsing a product id
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProductIdParseError {
    #[error("Product id must be BASE-QUOTE: {0}")]
    InvalidFormat(String),

    #[error("Product id has empty base or quote: {0}")]
    EmptyPart(String),
}
