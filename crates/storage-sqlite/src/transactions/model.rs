//! Database model for transactions.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use tallybook_core::transactions::{NewTransaction, Transaction, TransactionUpdate};
use tallybook_core::Result;

use crate::utils::{from_cents, to_cents};

/// Database model for transactions. `amount` is a positive number of cents.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub notes: String,
    pub tags: String,
    pub attachment: Option<String>,
    pub is_recurring: bool,
    pub recurrence_interval: String,
    pub recurrence_end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            account_id: db.account_id,
            category_id: db.category_id,
            date: db.date,
            amount: from_cents(db.amount),
            currency: db.currency,
            description: db.description,
            notes: db.notes,
            tags: db.tags,
            attachment: db.attachment,
            is_recurring: db.is_recurring,
            recurrence_interval: db.recurrence_interval.parse().unwrap_or_default(),
            recurrence_end_date: db.recurrence_end_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl TransactionDB {
    pub fn from_new(domain: NewTransaction) -> Result<Self> {
        let now = chrono::Utc::now().naive_utc();
        Ok(Self {
            id: domain.id.unwrap_or_default(),
            user_id: domain.user_id,
            account_id: domain.account_id,
            category_id: domain.category_id,
            date: domain.date,
            amount: to_cents(domain.amount)?,
            currency: domain.currency,
            description: domain.description,
            notes: domain.notes,
            tags: domain.tags,
            attachment: domain.attachment,
            is_recurring: domain.is_recurring,
            recurrence_interval: domain.recurrence_interval.as_str().to_string(),
            recurrence_end_date: domain.recurrence_end_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update over the stored row, keeping owner and creation time.
    pub fn apply_update(self, update: TransactionUpdate) -> Result<Self> {
        Ok(Self {
            account_id: update.account_id,
            category_id: update.category_id,
            date: update.date,
            amount: to_cents(update.amount)?,
            currency: update.currency,
            description: update.description,
            notes: update.notes,
            tags: update.tags,
            attachment: update.attachment,
            is_recurring: update.is_recurring,
            recurrence_interval: update.recurrence_interval.as_str().to_string(),
            recurrence_end_date: update.recurrence_end_date,
            updated_at: chrono::Utc::now().naive_utc(),
            ..self
        })
    }
}
