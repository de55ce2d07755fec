//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account with `current_balance` equal to its initial balance.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account.
    ///
    /// A change of initial balance shifts the current balance by the same
    /// delta within the same write.
    async fn update(&self, account_update: AccountUpdate) -> Result<Account>;

    /// Deletes an account by its ID.
    ///
    /// Fails with `ConstraintViolation` while transactions reference it.
    async fn delete(&self, account_id: &str) -> Result<usize>;

    /// Retrieves an account by its ID.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Lists the user's accounts ordered by name.
    fn list(&self, user_id: &str) -> Result<Vec<Account>>;
}

/// Trait defining the contract for Account service operations.
///
/// Every operation is scoped to the acting user.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn create_account(&self, user_id: &str, new_account: NewAccount) -> Result<Account>;

    async fn update_account(&self, user_id: &str, account_update: AccountUpdate)
        -> Result<Account>;

    async fn delete_account(&self, user_id: &str, account_id: &str) -> Result<()>;

    fn get_account(&self, user_id: &str, account_id: &str) -> Result<Account>;

    fn list_accounts(&self, user_id: &str) -> Result<Vec<Account>>;
}
