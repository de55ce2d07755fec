use thiserror::Error;

/// Failures of an exchange-rate lookup. The converter never surfaces these
/// to its callers; they are logged and replaced by the fallback rate.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Fetch error: {0}")]
    FetchError(String),

    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
}

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        FxError::FetchError(err.to_string())
    }
}
