use crate::error::MarketDataError;
use crate::{PriceSource, Quote};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A deterministic price source backed by a fixed symbol→price table.
///
/// Used to exercise the executor and reporting paths without network I/O,
/// and by callers that want to value a portfolio at prices of their own.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    prices: HashMap<String, Decimal>,
}

impl FixedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a price to the table, builder style.
    pub fn with_price(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }
}

#[async_trait]
impl PriceSource for FixedSource {
    async fn get_price(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        match self.prices.get(symbol) {
            Some(price) => Ok(Quote {
                symbol: symbol.to_string(),
                price: *price,
                timestamp: Utc::now(),
            }),
            None => Err(MarketDataError::PriceUnavailable {
                symbol: symbol.to_string(),
                attempts: 1,
                last_error: "no fixed price configured".to_string(),
            }),
        }
    }
}
