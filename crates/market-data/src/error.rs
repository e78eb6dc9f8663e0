use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to build or send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("No price available for {symbol} after {attempts} attempt(s): {last_error}")]
    PriceUnavailable {
        symbol: String,
        attempts: u32,
        last_error: String,
    },
}
