use async_trait::async_trait;
use rust_decimal::Decimal;

use super::fx_errors::FxError;

/// Source of live exchange rates.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Units of `target` per one unit of `base`.
    async fn fetch_rate(&self, base: &str, target: &str) -> Result<Decimal, FxError>;
}

/// Rate storage keyed by (base, target). Expired entries are misses.
pub trait RateCache: Send + Sync {
    fn get(&self, base: &str, target: &str) -> Option<Decimal>;

    fn put(&self, base: &str, target: &str, rate: Decimal);
}

/// Currency conversion that never fails: lookups that cannot be completed
/// fall back to a neutral rate.
#[async_trait]
pub trait CurrencyConverterTrait: Send + Sync {
    async fn rate(&self, base: &str, target: &str) -> Decimal;

    async fn convert_amount(&self, amount: Decimal, base: &str, target: &str) -> Decimal;
}
