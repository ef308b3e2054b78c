//! Shared types for the Coinbase Exchange WebSocket feed
//!
//! This crate provides the type definitions used across the workspace.
//! It has no async dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`ProductId`] - Trading pair identifiers (e.g., "BTC-USD")
//! - [`Level`] - A price level with decimal precision
//! - [`Side`] - Order side (buy maps to bids, sell to asks)
//! - [`FeedMessage`] - Parsed WebSocket message
//! - [`FeedError`] - Error types

pub mod enums;
pub mod error;
pub mod level;
pub mod messages;
pub mod product;

// Re-export commonly used types
pub use enums::*;
pub use error::*;
pub use level::*;
pub use messages::*;
pub use product::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
