//! FX (Foreign Exchange) module - cached rate lookups and amount conversion.

mod currency_converter;
mod fx_errors;
mod fx_traits;
mod rate_cache;
mod rate_provider;

#[cfg(test)]
mod currency_converter_tests;

pub use currency_converter::{CurrencyConverter, FALLBACK_RATE};
pub use fx_errors::FxError;
pub use fx_traits::{CurrencyConverterTrait, ExchangeRateProvider, RateCache};
pub use rate_cache::{InMemoryRateCache, DEFAULT_RATE_TTL};
pub use rate_provider::{HttpRateProvider, DEFAULT_FX_BASE_URL, DEFAULT_FX_TIMEOUT};
