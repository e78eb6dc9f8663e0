//! # Meridian Configuration Crate
//!
//! Loads and validates the strongly-typed application configuration.
//!
//! ## Architectural Principles
//!
//! - **Closed Field Set:** Every section deserializes with
//!   `deny_unknown_fields`, so a typo in the file is a load error rather
//!   than a silently ignored setting.
//! - **Defaults Everywhere:** The configuration file is optional; every
//!   section has a sensible `Default` and the engine runs without one.
//!
//! ## Public API
//!
//! - `load_config`: The primary entry point; reads `meridian.toml`.
//! - `Config` and its sections (`Execution`, `LedgerPolicy`, `MarketData`,
//!   `Storage`, `AccountDefaults`).
//! - `ConfigError`: The specific error types that can be returned from this crate.

use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AccountDefaults, Config, Execution, LedgerPolicy, MarketData, Storage};

/// Loads the application configuration from `meridian.toml`, or from the
/// given path when one is supplied on the command line.
///
/// A missing file is not an error; the returned `Config` is then entirely
/// defaults. A present-but-malformed file is always an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let source = match path {
        Some(p) => config::File::from(p).required(true),
        None => config::File::with_name("meridian").required(false),
    };

    let builder = config::Config::builder().add_source(source).build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let config = builder.try_deserialize::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.account.currency, "USDT");
        assert_eq!(config.execution.fee_bps, Decimal::ZERO);
        assert_eq!(config.market_data.max_retries, 3);
        assert!(!config.ledger.allow_overdraft);
        assert!(!config.ledger.allow_short_selling);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse(
            r#"
            [execution]
            fee_bps = 4
            slippage_bps = 10

            [ledger]
            allow_overdraft = true
            "#,
        )
        .unwrap();
        assert_eq!(config.execution.fee_bps, dec!(4));
        assert_eq!(config.execution.slippage_bps, dec!(10));
        assert!(config.ledger.allow_overdraft);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = parse(
            r#"
            [execution]
            fee_percent = 4
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_fee_fails_validation() {
        let result = parse(
            r#"
            [execution]
            fee_bps = -1
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let result = parse(
            r#"
            [market_data]
            timeout_secs = 0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
