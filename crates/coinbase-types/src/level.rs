//! Price level type with decimal precision

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single price level: price and the aggregated resting size at it
///
/// The feed transmits levels as two-element string arrays `["price", "size"]`.
/// Values are kept as [`Decimal`] rather than floats: decimal strings parse
/// exactly, and `Decimal` is totally ordered so it can serve as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLevel")]
pub struct Level {
    /// Price of this level
    pub price: Decimal,
    /// Aggregated size resting at this price
    pub size: Decimal,
}

/// Wire form of a level before decimal parsing
type RawLevel = (String, String);

impl Level {
    /// Create a new price level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Check if this level has zero size (a removal sentinel, never a
    /// valid resting level)
    pub fn is_zero(&self) -> bool {
        self.size.is_zero()
    }
}

impl TryFrom<RawLevel> for Level {
    type Error = rust_decimal::Error;

    fn try_from((price, size): RawLevel) -> Result<Self, Self::Error> {
        Ok(Self {
            price: Decimal::from_str(&price)?,
            size: Decimal::from_str(&size)?,
        })
    }
}
