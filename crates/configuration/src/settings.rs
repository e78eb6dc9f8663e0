use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file and falls back to its `Default`
/// implementation; unknown fields anywhere in the document are rejected
/// rather than silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub account: AccountDefaults,
    pub execution: Execution,
    pub ledger: LedgerPolicy,
    pub market_data: MarketData,
    pub storage: Storage,
}

/// Defaults applied when a new account is created by `init`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AccountDefaults {
    /// The quote currency the account is denominated in (e.g., "USDT").
    pub currency: String,
}

impl Default for AccountDefaults {
    fn default() -> Self {
        Self {
            currency: "USDT".to_string(),
        }
    }
}

/// Contains parameters for the simulated execution cost model.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Execution {
    /// The trading fee charged per fill, in basis points of notional.
    /// 4 corresponds to 0.04%.
    pub fee_bps: Decimal,

    /// The assumed price slippage applied to market orders, in basis
    /// points. The fetched price is moved against the order by this
    /// amount. Limit-price fills are exact and never slipped.
    pub slippage_bps: Decimal,
}

impl Default for Execution {
    fn default() -> Self {
        Self {
            fee_bps: Decimal::ZERO,
            slippage_bps: Decimal::ZERO,
        }
    }
}

/// Business-rule switches enforced by the accounting layer.
///
/// Both default to disabled; enabling either is an explicit opt-in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LedgerPolicy {
    /// Allow the cash balance to go negative on a buy.
    pub allow_overdraft: bool,
    /// Allow sells that exceed the held quantity.
    pub allow_short_selling: bool,
}

/// Contains parameters for the external market-data feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MarketData {
    /// Base URL of the spot price API.
    pub base_url: String,
    /// Hard timeout applied to every price request, in seconds.
    pub timeout_secs: u64,
    /// Total attempts per lookup before the price is reported unavailable.
    pub max_retries: u32,
    /// Base delay between attempts; grows linearly with the attempt number.
    pub retry_backoff_ms: u64,
    /// How long a fetched quote may be served from the in-process cache.
    pub cache_ttl_secs: u64,
}

impl Default for MarketData {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 5,
            max_retries: 3,
            retry_backoff_ms: 250,
            cache_ttl_secs: 5,
        }
    }
}

/// Where the ledger document lives on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Storage {
    /// Overrides the platform data directory when set.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Checks cross-field constraints that the type system cannot express.
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError::ValidationError;

        if self.execution.fee_bps.is_sign_negative() {
            return Err(ValidationError("execution.fee_bps must not be negative".to_string()));
        }
        if self.execution.slippage_bps.is_sign_negative() {
            return Err(ValidationError(
                "execution.slippage_bps must not be negative".to_string(),
            ));
        }
        if self.market_data.timeout_secs == 0 {
            return Err(ValidationError("market_data.timeout_secs must be at least 1".to_string()));
        }
        if self.market_data.max_retries == 0 {
            return Err(ValidationError("market_data.max_retries must be at least 1".to_string()));
        }
        if self.account.currency.trim().is_empty() {
            return Err(ValidationError("account.currency must not be empty".to_string()));
        }
        Ok(())
    }
}
