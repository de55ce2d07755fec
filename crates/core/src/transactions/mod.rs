//! Transactions module - ledger entries and the balance maintenance rules.

mod balance;
mod transactions_model;
mod transactions_service;
mod transactions_traits;



pub use balance::{
    plan_bulk_create, plan_create, plan_delete, plan_update, BalanceAdjustment, LedgerEntry,
};
pub use transactions_model::{
    normalize_tags, signed_amount, NewTransaction, RecurrenceInterval, Transaction,
    TransactionDetails, TransactionFilter, TransactionUpdate, ALLOWED_ATTACHMENT_EXTENSIONS,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
