//! SQLite storage implementation for Tallybook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `tallybook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all ledger entities
//! - Database-specific model types (with Diesel derives)
//!
//! All writes go through a single writer actor. Each repository write runs as
//! one immediate transaction, so a transaction row and the account balances
//! it moves are committed together.
//!
//! ```text
//!   core (domain + services)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod transactions;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

pub use accounts::AccountRepository;
pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

// Re-export from tallybook-core for convenience
pub use tallybook_core::errors::{DatabaseError, Error, Result};
