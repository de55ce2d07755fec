use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use std::sync::Arc;

use super::budgets_model::{Budget, BudgetProgress, BudgetUpdate, NewBudget};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::ledger::{ensure_owned, ensure_reference_owned};
use crate::transactions::TransactionRepositoryTrait;

pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            category_repository,
            transaction_repository,
        }
    }

    fn check_category(&self, user_id: &str, category_id: Option<&str>) -> Result<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        let category = match self.category_repository.get_by_id(category_id) {
            Ok(category) => category,
            Err(e) if e.is_not_found() => {
                return Err(Error::invalid(format!("Unknown category: {}", category_id)))
            }
            Err(e) => return Err(e),
        };
        ensure_reference_owned(&category, user_id)?;
        if !category.is_expense() {
            return Err(Error::invalid("Budgets can only target expense categories."));
        }
        Ok(())
    }

    fn evaluate(&self, budget: Budget, today: NaiveDate) -> Result<BudgetProgress> {
        let (start, end) = budget.active_range(today);
        let spent = self.transaction_repository.sum_expenses(
            &budget.user_id,
            start,
            end,
            budget.category_id.as_deref(),
        )?;
        Ok(BudgetProgress::new(budget, (start, end), spent))
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn create_budget(
        &self,
        user_id: &str,
        new_budget: NewBudget,
        today: NaiveDate,
    ) -> Result<Budget> {
        let mut new_budget = new_budget;
        new_budget.user_id = user_id.to_string();
        new_budget.validate(today)?;
        self.check_category(user_id, new_budget.category_id.as_deref())?;
        debug!("Creating budget '{}' for user {}", new_budget.name, user_id);
        self.repository.create(new_budget).await
    }

    async fn update_budget(&self, user_id: &str, update: BudgetUpdate) -> Result<Budget> {
        let mut update = update;
        update.validate()?;
        ensure_owned(self.repository.get_by_id(&update.id)?, user_id)?;
        self.check_category(user_id, update.category_id.as_deref())?;
        self.repository.update(update).await
    }

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()> {
        ensure_owned(self.repository.get_by_id(budget_id)?, user_id)?;
        self.repository.delete(budget_id).await?;
        Ok(())
    }

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        ensure_owned(self.repository.get_by_id(budget_id)?, user_id)
    }

    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        self.repository.list(user_id)
    }

    fn evaluate_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        today: NaiveDate,
    ) -> Result<BudgetProgress> {
        let budget = ensure_owned(self.repository.get_by_id(budget_id)?, user_id)?;
        self.evaluate(budget, today)
    }

    fn progress_for_user(
        &self,
        user_id: &str,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Result<Vec<BudgetProgress>> {
        let budgets = self.repository.list(user_id)?;
        budgets
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|budget| self.evaluate(budget, today))
            .collect()
    }
}
