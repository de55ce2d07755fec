use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::transactions_model::{
    NewTransaction, Transaction, TransactionDetails, TransactionFilter, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::accounts::AccountRepositoryTrait;
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::ledger::{ensure_owned, ensure_reference_owned};
use crate::utils::money::normalize_currency;

/// Validates transaction writes and hands them to the repository, which
/// keeps account balances in step.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            account_repository,
            category_repository,
        }
    }

    /// Checks that the account and category belong to `user_id` and returns
    /// the effective currency code.
    fn check_references(
        &self,
        user_id: &str,
        account_id: &str,
        category_id: Option<&str>,
        currency: &str,
    ) -> Result<String> {
        let account = match self.account_repository.get_by_id(account_id) {
            Ok(account) => account,
            Err(e) if e.is_not_found() => {
                return Err(Error::invalid(format!("Unknown account: {}", account_id)))
            }
            Err(e) => return Err(e),
        };
        ensure_reference_owned(&account, user_id)?;

        if let Some(category_id) = category_id {
            let category = match self.category_repository.get_by_id(category_id) {
                Ok(category) => category,
                Err(e) if e.is_not_found() => {
                    return Err(Error::invalid(format!("Unknown category: {}", category_id)))
                }
                Err(e) => return Err(e),
            };
            ensure_reference_owned(&category, user_id)?;
        }

        if currency.trim().is_empty() {
            return Ok(account.currency);
        }
        normalize_currency(currency)
            .ok_or_else(|| Error::invalid(format!("Invalid currency code: {}", currency)))
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn prepare_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<NewTransaction> {
        let mut new_transaction = new_transaction;
        new_transaction.user_id = user_id.to_string();
        new_transaction.validate()?;
        new_transaction.currency = self.check_references(
            user_id,
            &new_transaction.account_id,
            new_transaction.category_id.as_deref(),
            &new_transaction.currency,
        )?;
        Ok(new_transaction)
    }

    async fn create_transaction(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        let prepared = self.prepare_transaction(user_id, new_transaction)?;
        debug!(
            "Creating transaction of {} {} on account {}",
            prepared.amount, prepared.currency, prepared.account_id
        );
        self.repository.create(prepared).await
    }

    async fn create_transactions(
        &self,
        user_id: &str,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<usize> {
        let prepared = new_transactions
            .into_iter()
            .map(|t| self.prepare_transaction(user_id, t))
            .collect::<Result<Vec<_>>>()?;
        if prepared.is_empty() {
            return Ok(0);
        }
        self.repository.create_many(prepared).await
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let mut update = update;
        update.validate()?;
        ensure_owned(self.repository.get_by_id(&update.id)?, user_id)?;
        update.currency = self.check_references(
            user_id,
            &update.account_id,
            update.category_id.as_deref(),
            &update.currency,
        )?;
        self.repository.update(update).await
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<()> {
        ensure_owned(self.repository.get_by_id(transaction_id)?, user_id)?;
        let deleted = self.repository.delete(transaction_id).await?;
        debug!(
            "Deleted transaction {} from account {}",
            deleted.id, deleted.account_id
        );
        Ok(())
    }

    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        ensure_owned(self.repository.get_by_id(transaction_id)?, user_id)
    }

    fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionDetails>> {
        self.repository.list(user_id, filter)
    }
}
