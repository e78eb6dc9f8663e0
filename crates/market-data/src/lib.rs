//! # Meridian Market Data Crate
//!
//! The engine's only outward dependency for valuation: fetching a current
//! quoted price for a symbol from an external data feed.
//!
//! ## Architectural Principles
//!
//! - **Trait Seam:** Consumers depend on the `PriceSource` trait, never on
//!   a concrete client. The executor and the CLI can run against the live
//!   `BinanceSource` or the deterministic `FixedSource` interchangeably.
//! - **Bounded Failure:** Every lookup runs under a hard timeout and a
//!   bounded retry budget. On exhaustion the caller gets
//!   `PriceUnavailable`; a stale or fabricated price is never returned.
//! - **Ephemeral Cache:** Successful lookups are cached for a few seconds
//!   to avoid redundant calls within one command invocation. The cache is
//!   memory-only and dies with the process.
//!
//! ## Public API
//!
//! - `PriceSource`: The async trait all price feeds implement.
//! - `Quote`: A priced symbol with its fetch timestamp.
//! - `BinanceSource`: The live HTTP implementation.
//! - `FixedSource`: A deterministic in-memory implementation for tests
//!   and offline use.
//! - `MarketDataError`: The specific error types that can be returned from this crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Declare the modules that constitute this crate.
pub mod binance;
pub mod cache;
pub mod error;
pub mod fixed;

// Re-export the key components to provide a clean, public-facing API.
pub use binance::BinanceSource;
pub use cache::QuoteCache;
pub use error::MarketDataError;
pub use fixed::FixedSource;

/// A current quoted price for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// The generic, abstract interface for a market price feed.
/// This trait is the contract the executor and CLI use, allowing the
/// underlying implementation (live or fixed) to be swapped out.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches the current quoted price for a symbol.
    async fn get_price(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}
