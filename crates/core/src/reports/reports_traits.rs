use async_trait::async_trait;
use chrono::NaiveDate;

use super::reports_model::{AccountOverview, CashflowReport, DashboardSummary, SpendingReport};
use crate::budgets::BudgetProgress;
use crate::errors::Result;

/// Read-only views over one user's ledger. `today` is the user's local date.
#[async_trait]
pub trait ReportsServiceTrait: Send + Sync {
    /// Totals converted to the user's primary currency.
    async fn dashboard_summary(&self, user_id: &str, today: NaiveDate)
        -> Result<DashboardSummary>;

    fn accounts_overview(&self, user_id: &str) -> Result<Vec<AccountOverview>>;

    fn spending_by_category(
        &self,
        user_id: &str,
        today: NaiveDate,
        months: Option<i64>,
    ) -> Result<SpendingReport>;

    fn cashflow(&self, user_id: &str, today: NaiveDate, months: Option<i64>)
        -> Result<CashflowReport>;

    fn budget_progress(
        &self,
        user_id: &str,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Result<Vec<BudgetProgress>>;
}
