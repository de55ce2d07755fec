//! Tallybook Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger rules of Tallybook: accounts, categories,
//! transactions with their balance maintenance, budgets, CSV import/export,
//! currency conversion and dashboard reports. It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod export;
pub mod fx;
pub mod import;
pub mod ledger;
pub mod reports;
pub mod transactions;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
