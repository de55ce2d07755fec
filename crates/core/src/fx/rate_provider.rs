use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use super::fx_errors::FxError;
use super::fx_traits::ExchangeRateProvider;

pub const DEFAULT_FX_BASE_URL: &str = "https://api.exchangerate.host";

/// Short timeout; a slow rate service must not hold up requests.
pub const DEFAULT_FX_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: Option<f64>,
}

/// Exchange-rate service client: `GET {base_url}/convert?from=..&to=..`
/// answering `{"result": <number>}`.
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
}

impl HttpRateProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn convert_url(&self) -> String {
        format!("{}/convert", self.base_url)
    }
}

impl Default for HttpRateProvider {
    fn default() -> Self {
        Self::new(DEFAULT_FX_BASE_URL, DEFAULT_FX_TIMEOUT)
    }
}

#[async_trait]
impl ExchangeRateProvider for HttpRateProvider {
    async fn fetch_rate(&self, base: &str, target: &str) -> Result<Decimal, FxError> {
        let response = self
            .client
            .get(self.convert_url())
            .query(&[("from", base), ("to", target)])
            .send()
            .await?
            .error_for_status()?;

        let body: ConvertResponse = response
            .json()
            .await
            .map_err(|e| FxError::FetchError(format!("Malformed rate response: {}", e)))?;

        let value = body
            .result
            .ok_or_else(|| FxError::RateNotFound(format!("{}/{}", base, target)))?;
        // Go through the shortest decimal representation of the float.
        let rate = Decimal::from_str(&value.to_string())
            .map_err(|e| FxError::InvalidRate(format!("{}: {}", value, e)))?;
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{} for {}/{}",
                rate, base, target
            )));
        }
        Ok(rate)
    }
}
