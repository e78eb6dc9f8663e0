use ledger::LedgerError;
use market_data::MarketDataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Could not resolve an execution price: {0}")]
    PriceUnavailable(#[from] MarketDataError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
