use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::fx_traits::{CurrencyConverterTrait, ExchangeRateProvider, RateCache};
use crate::constants::DEFAULT_CURRENCY;
use crate::utils::money::round_money;

/// Rate used whenever a live rate cannot be obtained.
pub const FALLBACK_RATE: Decimal = Decimal::ONE;

/// Converts amounts with cached live rates.
///
/// Same-currency conversions never touch the cache or the provider. Any
/// lookup failure, including a non-positive rate, yields [`FALLBACK_RATE`]
/// and a warning instead of an error.
pub struct CurrencyConverter {
    provider: Arc<dyn ExchangeRateProvider>,
    cache: Arc<dyn RateCache>,
}

impl CurrencyConverter {
    pub fn new(provider: Arc<dyn ExchangeRateProvider>, cache: Arc<dyn RateCache>) -> Self {
        Self { provider, cache }
    }

    fn normalize(code: &str) -> String {
        let code = code.trim();
        if code.is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            code.to_ascii_uppercase()
        }
    }
}

#[async_trait]
impl CurrencyConverterTrait for CurrencyConverter {
    async fn rate(&self, base: &str, target: &str) -> Decimal {
        let base = Self::normalize(base);
        let target = Self::normalize(target);
        if base == target {
            return Decimal::ONE;
        }

        if let Some(rate) = self.cache.get(&base, &target) {
            return rate;
        }

        match self.provider.fetch_rate(&base, &target).await {
            Ok(rate) if rate > Decimal::ZERO => {
                debug!("Fetched exchange rate {}/{} = {}", base, target, rate);
                self.cache.put(&base, &target, rate);
                rate
            }
            Ok(rate) => {
                warn!(
                    "Currency conversion failed: non-positive rate {} for {}/{}",
                    rate, base, target
                );
                FALLBACK_RATE
            }
            Err(e) => {
                warn!("Currency conversion failed for {}/{}: {}", base, target, e);
                FALLBACK_RATE
            }
        }
    }

    async fn convert_amount(&self, amount: Decimal, base: &str, target: &str) -> Decimal {
        if Self::normalize(base) == Self::normalize(target) {
            return amount;
        }
        let rate = self.rate(base, target).await;
        match amount.checked_mul(rate) {
            Some(converted) => round_money(converted),
            None => {
                warn!(
                    "Currency conversion of {} {}/{} overflows; using fallback rate",
                    amount, base, target
                );
                round_money(amount * FALLBACK_RATE)
            }
        }
    }
}
