//! SQLite storage implementation for transactions and the balance updates
//! they carry.

mod model;
mod repository;

pub use model::TransactionDB;
pub use repository::TransactionRepository;
