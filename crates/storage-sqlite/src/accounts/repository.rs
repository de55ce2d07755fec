use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use tallybook_core::accounts::{Account, AccountRepositoryTrait, AccountUpdate, NewAccount};
use tallybook_core::ledger::{ensure_deletable, DependentCounts, EntityKind};
use tallybook_core::transactions::BalanceAdjustment;
use tallybook_core::{Error, Result};

use super::model::AccountDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, unique_as_constraint, StorageError};
use crate::schema::{accounts, transactions};
use crate::utils::{new_id, to_cents};

const DUPLICATE_NAME: &str = "An account with this name already exists.";

/// Applies balance deltas with `current_balance = current_balance + delta`.
///
/// Must run on the writer connection, inside the job that writes the
/// transactions the deltas belong to.
pub(crate) fn apply_balance_adjustments(
    conn: &mut SqliteConnection,
    adjustments: &[BalanceAdjustment],
) -> Result<()> {
    let now = Utc::now().naive_utc();
    for adjustment in adjustments {
        let delta = to_cents(adjustment.delta)?;
        let updated = diesel::update(accounts::table.find(&adjustment.account_id))
            .set((
                accounts::current_balance.eq(accounts::current_balance + delta),
                accounts::updated_at.eq(now),
            ))
            .execute(conn)
            .map_err(StorageError::from)?;
        if updated == 0 {
            return Err(Error::not_found("account", &adjustment.account_id));
        }
        debug!(
            "Adjusted balance of account {} by {}",
            adjustment.account_id, adjustment.delta
        );
    }
    Ok(())
}

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let mut account_db = AccountDB::from_new(new_account)?;
                account_db.id = new_id(Some(account_db.id));

                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .map_err(StorageError::from)
                    .map_err(|e| unique_as_constraint(e.into(), DUPLICATE_NAME))?;
                Ok(account_db.into())
            })
            .await
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let account_id = account_update.id.clone().unwrap_or_default();
                let existing = not_found_as(
                    accounts::table
                        .find(&account_id)
                        .select(AccountDB::as_select())
                        .first::<AccountDB>(conn),
                    "account",
                    &account_id,
                )?;

                let initial = to_cents(account_update.initial_balance)?;
                let updated = AccountDB {
                    name: account_update.name,
                    account_type: account_update.account_type.as_str().to_string(),
                    currency: account_update.currency,
                    initial_balance: initial,
                    current_balance: existing.current_balance + (initial - existing.initial_balance),
                    description: account_update.description,
                    updated_at: Utc::now().naive_utc(),
                    ..existing
                };

                diesel::update(accounts::table.find(&account_id))
                    .set(&updated)
                    .execute(conn)
                    .map_err(StorageError::from)
                    .map_err(|e| unique_as_constraint(e.into(), DUPLICATE_NAME))?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete(&self, account_id: &str) -> Result<usize> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let counts = DependentCounts {
                    transactions: transactions::table
                        .filter(transactions::account_id.eq(&account_id))
                        .count()
                        .get_result::<i64>(conn)
                        .map_err(StorageError::from)?,
                    ..Default::default()
                };
                ensure_deletable(EntityKind::Account, &counts)?;

                let affected = diesel::delete(accounts::table.find(&account_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;
        let account = not_found_as(
            accounts::table
                .find(account_id)
                .select(AccountDB::as_select())
                .first::<AccountDB>(&mut conn),
            "account",
            account_id,
        )?;
        Ok(account.into())
    }

    fn list(&self, user_id: &str) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let results = accounts::table
            .filter(accounts::user_id.eq(user_id))
            .select(AccountDB::as_select())
            .order(accounts::name.asc())
            .load::<AccountDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(results.into_iter().map(Account::from).collect())
    }
}
