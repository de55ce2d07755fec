use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use tallybook_core::budgets::{Budget, BudgetRepositoryTrait, BudgetUpdate, NewBudget};
use tallybook_core::Result;

use super::model::BudgetDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::budgets;
use crate::utils::new_id;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn create(&self, new_budget: NewBudget) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let mut budget_db = BudgetDB::from_new(new_budget)?;
                budget_db.id = new_id(Some(budget_db.id));

                diesel::insert_into(budgets::table)
                    .values(&budget_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(budget_db.into())
            })
            .await
    }

    async fn update(&self, update: BudgetUpdate) -> Result<Budget> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let existing = not_found_as(
                    budgets::table
                        .find(&update.id)
                        .select(BudgetDB::as_select())
                        .first::<BudgetDB>(conn),
                    "budget",
                    &update.id,
                )?;
                let updated = existing.apply_update(update)?;

                diesel::update(budgets::table.find(&updated.id))
                    .set(&updated)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete(&self, budget_id: &str) -> Result<usize> {
        let budget_id = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(budgets::table.find(&budget_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    fn get_by_id(&self, budget_id: &str) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;
        let budget = not_found_as(
            budgets::table
                .find(budget_id)
                .select(BudgetDB::as_select())
                .first::<BudgetDB>(&mut conn),
            "budget",
            budget_id,
        )?;
        Ok(budget.into())
    }

    fn list(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        let results = budgets::table
            .filter(budgets::user_id.eq(user_id))
            .select(BudgetDB::as_select())
            .order(budgets::name.asc())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(results.into_iter().map(Budget::from).collect())
    }
}
