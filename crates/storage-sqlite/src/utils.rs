//! Money helpers for the storage layer.
//!
//! Amounts are persisted as integer cents so that balance arithmetic inside
//! SQL statements stays exact.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use tallybook_core::utils::money::round_money;
use tallybook_core::{Error, Result};
use uuid::Uuid;

/// Uses the caller-supplied id when present, otherwise a fresh UUID.
pub fn new_id(requested: Option<String>) -> String {
    requested
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Converts a decimal amount to cents, rounding to the nearest cent first.
pub fn to_cents(amount: Decimal) -> Result<i64> {
    round_money(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| Error::invalid(format!("Amount out of range: {}", amount)))
}

pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
