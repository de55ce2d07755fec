//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tallybook_core::accounts::{Account, NewAccount};

use crate::utils::{from_cents, to_cents};

/// Database model for accounts. Balances are stored in cents.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub initial_balance: i64,
    pub current_balance: i64,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            account_type: db.account_type.parse().unwrap_or_default(),
            currency: db.currency,
            initial_balance: from_cents(db.initial_balance),
            current_balance: from_cents(db.current_balance),
            description: db.description,
            created_at: db.created_at,
        }
    }
}

impl AccountDB {
    /// A new row starts with its current balance equal to the initial one.
    pub fn from_new(domain: NewAccount) -> tallybook_core::Result<Self> {
        let now = chrono::Utc::now().naive_utc();
        let initial = to_cents(domain.initial_balance)?;
        Ok(Self {
            id: domain.id.unwrap_or_default(),
            user_id: domain.user_id,
            name: domain.name,
            account_type: domain.account_type.as_str().to_string(),
            currency: domain.currency,
            initial_balance: initial,
            current_balance: initial,
            description: domain.description,
            created_at: now,
            updated_at: now,
        })
    }
}
