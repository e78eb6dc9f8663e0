use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Not enough cash available to execute trade. Required: {required}, Available: {available}")]
    InsufficientFunds { required: String, available: String },

    #[error("Not enough position to sell. Requested: {requested}, Available: {available}")]
    InsufficientPosition { requested: String, available: String },

    #[error("No market price supplied for held symbol: {0}")]
    MissingPrice(String),

    #[error("Ledger failed reconciliation. Expected cash: {expected}, Actual cash: {actual}")]
    OutOfBalance { expected: String, actual: String },

    #[error("Invalid trade input: {0}")]
    InvalidTrade(String),
}
