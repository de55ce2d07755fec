use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDetails, TransactionFilter, TransactionUpdate,
};
use crate::errors::Result;

/// Persistence contract for transactions.
///
/// Every write method must apply the matching balance adjustments
/// (see [`crate::transactions::plan_create`] and friends) to the affected
/// accounts in the same atomic unit as the row change.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Inserts all transactions and their balance adjustments atomically.
    /// Returns the number of inserted rows.
    async fn create_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize>;

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction>;

    /// Reverses the balance effect and removes the row. Returns the deleted
    /// transaction.
    async fn delete(&self, transaction_id: &str) -> Result<Transaction>;

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;

    /// The user's transactions matching `filter`, newest first.
    fn list(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<TransactionDetails>>;

    fn count_for_user(&self, user_id: &str) -> Result<i64>;

    /// Sum of expense-category amounts dated within `[start, end]`,
    /// optionally restricted to one category. Zero when nothing matches.
    fn sum_expenses(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        category_id: Option<&str>,
    ) -> Result<Decimal>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Runs every check a transaction must pass before it is written:
    /// field rules, account and category ownership, currency defaulting.
    fn prepare_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<NewTransaction>;

    async fn create_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;

    /// Validates every transaction, then writes all of them atomically.
    async fn create_transactions(
        &self,
        user_id: &str,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<usize>;

    async fn update_transaction(
        &self,
        user_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()>;

    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;

    fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetails>>;
}
