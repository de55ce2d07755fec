use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::fx_traits::RateCache;

/// How long a fetched rate stays valid.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: Decimal,
    fetched_at: Instant,
}

/// Process-wide rate cache with time-based expiry.
///
/// Concurrent misses on the same pair may both reach the provider; the last
/// write wins.
#[derive(Debug)]
pub struct InMemoryRateCache {
    ttl: Duration,
    entries: RwLock<HashMap<(String, String), CachedRate>>,
}

impl Default for InMemoryRateCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_RATE_TTL)
    }
}

impl InMemoryRateCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub(crate) fn get_at(&self, base: &str, target: &str, now: Instant) -> Option<Decimal> {
        let Ok(entries) = self.entries.read() else {
            return None;
        };
        entries
            .get(&(base.to_string(), target.to_string()))
            .filter(|cached| now.saturating_duration_since(cached.fetched_at) < self.ttl)
            .map(|cached| cached.rate)
    }

    pub(crate) fn put_at(&self, base: &str, target: &str, rate: Decimal, now: Instant) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                (base.to_string(), target.to_string()),
                CachedRate {
                    rate,
                    fetched_at: now,
                },
            );
        }
    }
}

impl RateCache for InMemoryRateCache {
    fn get(&self, base: &str, target: &str) -> Option<Decimal> {
        self.get_at(base, target, Instant::now())
    }

    fn put(&self, base: &str, target: &str, rate: Decimal) {
        self.put_at(base, target, rate, Instant::now())
    }
}
