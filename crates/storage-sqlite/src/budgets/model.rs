//! Database model for budgets.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use tallybook_core::budgets::{Budget, BudgetUpdate, NewBudget};
use tallybook_core::Result;

use crate::utils::{from_cents, to_cents};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct BudgetDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub amount: i64,
    pub period: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl From<BudgetDB> for Budget {
    fn from(db: BudgetDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            category_id: db.category_id,
            amount: from_cents(db.amount),
            period: db.period.parse().unwrap_or_default(),
            start_date: db.start_date,
            end_date: db.end_date,
            created_at: db.created_at,
        }
    }
}

impl BudgetDB {
    pub fn from_new(domain: NewBudget) -> Result<Self> {
        Ok(Self {
            id: domain.id.unwrap_or_default(),
            user_id: domain.user_id,
            name: domain.name,
            category_id: domain.category_id,
            amount: to_cents(domain.amount)?,
            period: domain.period.as_str().to_string(),
            start_date: domain.start_date.unwrap_or_else(|| Utc::now().date_naive()),
            end_date: domain.end_date,
            created_at: Utc::now().naive_utc(),
        })
    }

    pub fn apply_update(self, update: BudgetUpdate) -> Result<Self> {
        Ok(Self {
            name: update.name,
            category_id: update.category_id,
            amount: to_cents(update.amount)?,
            period: update.period.as_str().to_string(),
            start_date: update.start_date,
            end_date: update.end_date,
            ..self
        })
    }
}
