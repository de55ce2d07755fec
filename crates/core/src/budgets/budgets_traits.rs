use async_trait::async_trait;
use chrono::NaiveDate;

use super::budgets_model::{Budget, BudgetProgress, BudgetUpdate, NewBudget};
use crate::errors::Result;

#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    async fn create(&self, new_budget: NewBudget) -> Result<Budget>;

    async fn update(&self, update: BudgetUpdate) -> Result<Budget>;

    async fn delete(&self, budget_id: &str) -> Result<usize>;

    fn get_by_id(&self, budget_id: &str) -> Result<Budget>;

    /// The user's budgets ordered by name.
    fn list(&self, user_id: &str) -> Result<Vec<Budget>>;
}

#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    /// `today` supplies the default start date.
    async fn create_budget(
        &self,
        user_id: &str,
        new_budget: NewBudget,
        today: NaiveDate,
    ) -> Result<Budget>;

    async fn update_budget(&self, user_id: &str, update: BudgetUpdate) -> Result<Budget>;

    async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<()>;

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget>;

    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;

    /// Spent, remaining and percentage for one budget as of `today`.
    fn evaluate_budget(&self, user_id: &str, budget_id: &str, today: NaiveDate)
        -> Result<BudgetProgress>;

    /// Progress of the user's budgets ordered by name, optionally truncated.
    fn progress_for_user(
        &self,
        user_id: &str,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Result<Vec<BudgetProgress>>;
}
