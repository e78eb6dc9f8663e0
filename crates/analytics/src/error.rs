use ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Valuation failed: {0}")]
    Valuation(#[from] LedgerError),
}
