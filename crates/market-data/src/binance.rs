use crate::cache::QuoteCache;
use crate::error::MarketDataError;
use crate::{PriceSource, Quote};
use async_trait::async_trait;
use chrono::Utc;
use configuration::MarketData;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// A concrete implementation of `PriceSource` for the Binance spot API.
///
/// Lookups hit `/api/v3/ticker/price` under a client-level timeout and a
/// bounded retry budget with linear backoff. Successful quotes are held in
/// an in-process cache for a few seconds.
pub struct BinanceSource {
    client: reqwest::Client,
    settings: MarketData,
    cache: QuoteCache,
}

// Intermediate struct for deserializing the ticker response.
#[derive(Debug, Deserialize)]
struct RawTicker {
    symbol: String,
    price: String,
}

impl BinanceSource {
    pub fn new(settings: MarketData) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to build reqwest client");
        let cache = QuoteCache::new(Duration::from_secs(settings.cache_ttl_secs));

        Self {
            client,
            settings,
            cache,
        }
    }

    /// One attempt against the ticker endpoint, no retries.
    async fn fetch_ticker(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/api/v3/ticker/price", self.settings.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MarketDataError::InvalidData(format!(
                "ticker request for {symbol} returned {status}: {text}"
            )));
        }

        parse_ticker(&text)
    }
}

/// Parses a ticker response body into a `Quote`, rejecting non-positive
/// prices rather than letting them reach the accounting layer.
fn parse_ticker(text: &str) -> Result<Quote, MarketDataError> {
    let raw: RawTicker = serde_json::from_str(text)
        .map_err(|e| MarketDataError::Deserialization(e.to_string()))?;
    let price = Decimal::from_str(&raw.price)
        .map_err(|e| MarketDataError::Deserialization(e.to_string()))?;

    if price <= Decimal::ZERO {
        return Err(MarketDataError::InvalidData(format!(
            "non-positive price {} for {}",
            raw.price, raw.symbol
        )));
    }

    Ok(Quote {
        symbol: raw.symbol,
        price,
        timestamp: Utc::now(),
    })
}

#[async_trait]
impl PriceSource for BinanceSource {
    async fn get_price(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        if let Some(quote) = self.cache.get(symbol) {
            tracing::debug!(symbol, price = %quote.price, "serving quote from cache");
            return Ok(quote);
        }

        let mut last_error = String::new();
        for attempt in 1..=self.settings.max_retries {
            match self.fetch_ticker(symbol).await {
                Ok(quote) => {
                    tracing::debug!(symbol, price = %quote.price, attempt, "fetched quote");
                    self.cache.insert(quote.clone());
                    return Ok(quote);
                }
                Err(e) => {
                    tracing::warn!(symbol, attempt, error = %e, "price fetch failed");
                    last_error = e.to_string();
                    if attempt < self.settings.max_retries {
                        let backoff =
                            Duration::from_millis(self.settings.retry_backoff_ms * attempt as u64);
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(MarketDataError::PriceUnavailable {
            symbol: symbol.to_string(),
            attempts: self.settings.max_retries,
            last_error,
        })
    }
}
