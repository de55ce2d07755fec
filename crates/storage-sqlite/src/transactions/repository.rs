use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use tallybook_core::categories::CategoryKind;
use tallybook_core::transactions::{
    plan_bulk_create, plan_create, plan_delete, plan_update, signed_amount, LedgerEntry,
    NewTransaction, Transaction, TransactionDetails, TransactionFilter,
    TransactionRepositoryTrait, TransactionUpdate,
};
use tallybook_core::Result;

use super::model::TransactionDB;
use crate::accounts::apply_balance_adjustments;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{accounts, categories, transactions};
use crate::utils::{from_cents, new_id};

/// Looks up category kinds on the writer connection, once per category.
struct KindLookup<'a> {
    conn: &'a mut SqliteConnection,
    cache: HashMap<String, Option<CategoryKind>>,
}

impl<'a> KindLookup<'a> {
    fn new(conn: &'a mut SqliteConnection) -> Self {
        Self {
            conn,
            cache: HashMap::new(),
        }
    }

    fn kind(&mut self, category_id: Option<&str>) -> Result<Option<CategoryKind>> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };
        if let Some(kind) = self.cache.get(category_id) {
            return Ok(*kind);
        }
        let kind = categories::table
            .find(category_id)
            .select(categories::category_type)
            .first::<String>(&mut *self.conn)
            .optional()
            .map_err(StorageError::from)?
            .and_then(|raw| raw.parse::<CategoryKind>().ok());
        self.cache.insert(category_id.to_string(), kind);
        Ok(kind)
    }

    fn entry(&mut self, row: &TransactionDB) -> Result<LedgerEntry> {
        let kind = self.kind(row.category_id.as_deref())?;
        Ok(LedgerEntry::new(
            row.account_id.clone(),
            signed_amount(from_cents(row.amount), kind),
        ))
    }
}

fn load_row(conn: &mut SqliteConnection, transaction_id: &str) -> Result<TransactionDB> {
    not_found_as(
        transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(conn),
        "transaction",
        transaction_id,
    )
}

fn insert_row(conn: &mut SqliteConnection, row: &TransactionDB) -> Result<()> {
    diesel::insert_into(transactions::table)
        .values(row)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

/// `%` and `_` in user input match literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Transaction storage. Every write adjusts the affected account balances
/// in the same database transaction.
pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let mut row = TransactionDB::from_new(new_transaction)?;
                row.id = new_id(Some(row.id));

                let entry = KindLookup::new(conn).entry(&row)?;
                insert_row(conn, &row)?;
                apply_balance_adjustments(conn, &plan_create(&entry))?;
                Ok(row.into())
            })
            .await
    }

    async fn create_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut rows = Vec::with_capacity(new_transactions.len());
                for new_transaction in new_transactions {
                    let mut row = TransactionDB::from_new(new_transaction)?;
                    row.id = new_id(Some(row.id));
                    rows.push(row);
                }

                let entries = {
                    let mut lookup = KindLookup::new(conn);
                    rows.iter()
                        .map(|row| lookup.entry(row))
                        .collect::<Result<Vec<_>>>()?
                };

                for row in &rows {
                    insert_row(conn, row)?;
                }
                apply_balance_adjustments(conn, &plan_bulk_create(&entries))?;
                debug!("Inserted {} transactions in one batch", rows.len());
                Ok(rows.len())
            })
            .await
    }

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let existing = load_row(conn, &update.id)?;
                let updated = existing.clone().apply_update(update)?;

                let (old_entry, new_entry) = {
                    let mut lookup = KindLookup::new(conn);
                    (lookup.entry(&existing)?, lookup.entry(&updated)?)
                };

                diesel::update(transactions::table.find(&updated.id))
                    .set(&updated)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                apply_balance_adjustments(conn, &plan_update(&old_entry, &new_entry))?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete(&self, transaction_id: &str) -> Result<Transaction> {
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let existing = load_row(conn, &transaction_id)?;
                let entry = KindLookup::new(conn).entry(&existing)?;

                diesel::delete(transactions::table.find(&transaction_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                apply_balance_adjustments(conn, &plan_delete(&entry))?;
                Ok(existing.into())
            })
            .await
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_row(&mut conn, transaction_id)?.into())
    }

    fn list(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<TransactionDetails>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .inner_join(accounts::table)
            .left_join(categories::table)
            .filter(transactions::user_id.eq(user_id))
            .into_boxed();

        if let Some(account_id) = &filter.account_id {
            query = query.filter(transactions::account_id.eq(account_id));
        }
        if let Some(category_id) = &filter.category_id {
            query = query.filter(transactions::category_id.eq(category_id));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(transactions::date.ge(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(transactions::date.le(end));
        }
        if let Some(term) = filter.search_term() {
            // SQLite LIKE is case-insensitive for ASCII.
            let pattern = like_pattern(term);
            query = query.filter(
                transactions::description
                    .like(pattern.clone())
                    .escape('\\')
                    .or(transactions::notes.like(pattern).escape('\\')),
            );
        }

        let rows = query
            .select((
                TransactionDB::as_select(),
                accounts::name,
                categories::name.nullable(),
                categories::category_type.nullable(),
            ))
            .order((transactions::date.desc(), transactions::created_at.desc()))
            .load::<(TransactionDB, String, Option<String>, Option<String>)>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows
            .into_iter()
            .filter(|(row, _, _, _)| filter.matches_tags(&row.tags))
            .map(
                |(row, account_name, category_name, category_type)| TransactionDetails {
                    transaction: row.into(),
                    account_name,
                    category_name,
                    category_type: category_type.and_then(|raw| raw.parse().ok()),
                },
            )
            .collect())
    }

    fn count_for_user(&self, user_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let count = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count)
    }

    fn sum_expenses(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        category_id: Option<&str>,
    ) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .inner_join(categories::table)
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::date.ge(start))
            .filter(transactions::date.le(end))
            .filter(categories::category_type.eq(CategoryKind::Expense.as_str()))
            .into_boxed();
        if let Some(category_id) = category_id {
            query = query.filter(transactions::category_id.eq(category_id));
        }

        let total = query
            .select(sql::<BigInt>("COALESCE(SUM(transactions.amount), 0)"))
            .first::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(from_cents(total))
    }
}
