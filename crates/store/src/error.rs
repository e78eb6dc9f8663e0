use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read or write the ledger document: {0}")]
    Io(#[from] std::io::Error),

    #[error("The ledger document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine a platform data directory for the ledger")]
    NoDataDir,
}
