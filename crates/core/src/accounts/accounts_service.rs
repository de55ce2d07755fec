use log::debug;
use std::sync::Arc;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;
use crate::ledger::ensure_owned;

/// Service for managing accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, user_id: &str, new_account: NewAccount) -> Result<Account> {
        let mut new_account = new_account;
        new_account.user_id = user_id.to_string();
        new_account.validate()?;
        debug!(
            "Creating account '{}' ({}) for user {}",
            new_account.name, new_account.currency, user_id
        );
        self.repository.create(new_account).await
    }

    async fn update_account(
        &self,
        user_id: &str,
        account_update: AccountUpdate,
    ) -> Result<Account> {
        let mut account_update = account_update;
        account_update.validate()?;
        let account_id = account_update.id.clone().unwrap_or_default();
        ensure_owned(self.repository.get_by_id(&account_id)?, user_id)?;
        self.repository.update(account_update).await
    }

    async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()> {
        ensure_owned(self.repository.get_by_id(account_id)?, user_id)?;
        self.repository.delete(account_id).await?;
        debug!("Deleted account {}", account_id);
        Ok(())
    }

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<Account> {
        ensure_owned(self.repository.get_by_id(account_id)?, user_id)
    }

    fn list_accounts(&self, user_id: &str) -> Result<Vec<Account>> {
        self.repository.list(user_id)
    }
}
