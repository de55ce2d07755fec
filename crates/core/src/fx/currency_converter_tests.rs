#[cfg(test)]
mod tests {
    use crate::fx::{
        CurrencyConverter, CurrencyConverterTrait, ExchangeRateProvider, FxError,
        InMemoryRateCache, RateCache, FALLBACK_RATE,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Deterministic provider answering from a fixed table.
    struct FakeRateProvider {
        rates: HashMap<(String, String), Decimal>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeRateProvider {
        fn new(rates: &[(&str, &str, Decimal)]) -> Self {
            Self {
                rates: rates
                    .iter()
                    .map(|(b, t, r)| ((b.to_string(), t.to_string()), *r))
                    .collect(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            let mut provider = Self::new(&[]);
            provider.fail = true;
            provider
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateProvider for FakeRateProvider {
        async fn fetch_rate(&self, base: &str, target: &str) -> Result<Decimal, FxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FxError::FetchError("connection refused".to_string()));
            }
            self.rates
                .get(&(base.to_string(), target.to_string()))
                .copied()
                .ok_or_else(|| FxError::RateNotFound(format!("{}/{}", base, target)))
        }
    }

    /// Cache that records writes and never expires.
    #[derive(Default)]
    struct RecordingCache {
        entries: Mutex<HashMap<(String, String), Decimal>>,
    }

    impl RateCache for RecordingCache {
        fn get(&self, base: &str, target: &str) -> Option<Decimal> {
            self.entries
                .lock()
                .unwrap()
                .get(&(base.to_string(), target.to_string()))
                .copied()
        }

        fn put(&self, base: &str, target: &str, rate: Decimal) {
            self.entries
                .lock()
                .unwrap()
                .insert((base.to_string(), target.to_string()), rate);
        }
    }

    fn converter(provider: Arc<FakeRateProvider>) -> (CurrencyConverter, Arc<RecordingCache>) {
        let cache = Arc::new(RecordingCache::default());
        (CurrencyConverter::new(provider, cache.clone()), cache)
    }

    #[tokio::test]
    async fn same_currency_returns_amount_without_lookup() {
        let provider = Arc::new(FakeRateProvider::new(&[]));
        let (converter, cache) = converter(provider.clone());

        for amount in [dec!(0), dec!(1.005), dec!(-42.42), dec!(123456.789)] {
            assert_eq!(converter.convert_amount(amount, "USD", "USD").await, amount);
            assert_eq!(converter.convert_amount(amount, "usd", " USD ").await, amount);
        }
        assert_eq!(provider.calls(), 0);
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetched_rate_is_cached_per_pair() {
        let provider = Arc::new(FakeRateProvider::new(&[("EUR", "USD", dec!(1.10))]));
        let (converter, cache) = converter(provider.clone());

        assert_eq!(converter.convert_amount(dec!(100), "eur", "USD").await, dec!(110.00));
        assert_eq!(converter.convert_amount(dec!(10), "EUR", "USD").await, dec!(11.00));
        assert_eq!(provider.calls(), 1);
        assert_eq!(cache.get("EUR", "USD"), Some(dec!(1.10)));
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_one() {
        let provider = Arc::new(FakeRateProvider::failing());
        let (converter, cache) = converter(provider.clone());

        assert_eq!(converter.rate("GBP", "JPY").await, FALLBACK_RATE);
        assert_eq!(converter.convert_amount(dec!(19.99), "GBP", "JPY").await, dec!(19.99));
        assert!(cache.entries.lock().unwrap().is_empty());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn non_positive_rate_is_not_cached() {
        let provider = Arc::new(FakeRateProvider::new(&[("USD", "EUR", dec!(0))]));
        let (converter, cache) = converter(provider.clone());

        assert_eq!(converter.rate("USD", "EUR").await, Decimal::ONE);
        assert!(cache.get("USD", "EUR").is_none());
    }

    #[tokio::test]
    async fn conversion_rounds_to_cents() {
        let provider = Arc::new(FakeRateProvider::new(&[("USD", "EUR", dec!(0.9137))]));
        let (converter, _) = converter(provider);

        assert_eq!(converter.convert_amount(dec!(10), "USD", "EUR").await, dec!(9.14));
    }

    #[tokio::test]
    async fn overflowing_conversion_uses_fallback_rate() {
        let provider = Arc::new(FakeRateProvider::new(&[("USD", "EUR", dec!(2))]));
        let (converter, _) = converter(provider);

        let converted = converter.convert_amount(Decimal::MAX, "USD", "EUR").await;
        assert_eq!(converted, Decimal::MAX);
        assert_eq!(converter.convert_amount(dec!(3), "USD", "EUR").await, dec!(6));
    }

    #[tokio::test]
    async fn blank_codes_are_treated_as_usd() {
        let provider = Arc::new(FakeRateProvider::new(&[]));
        let (converter, _) = converter(provider.clone());

        assert_eq!(converter.rate("", "usd").await, Decimal::ONE);
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn in_memory_cache_expires_after_ttl() {
        let cache = InMemoryRateCache::with_ttl(Duration::from_secs(60));
        let now = Instant::now();
        cache.put_at("EUR", "USD", dec!(1.1), now);

        assert_eq!(cache.get_at("EUR", "USD", now + Duration::from_secs(59)), Some(dec!(1.1)));
        assert_eq!(cache.get_at("EUR", "USD", now + Duration::from_secs(60)), None);
        assert_eq!(cache.get_at("USD", "EUR", now), None);
    }

    #[test]
    fn default_cache_keeps_rates_for_twelve_hours() {
        let cache = InMemoryRateCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(12 * 3600));
        cache.put("CHF", "EUR", dec!(1.05));
        assert_eq!(cache.get("CHF", "EUR"), Some(dec!(1.05)));
    }
}
