use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::reports_model::{
    clamp_months, AccountOverview, CashflowReport, DashboardSummary, SpendingReport,
    DEFAULT_CASHFLOW_MONTHS, DEFAULT_SPENDING_MONTHS,
};
use super::reports_traits::ReportsServiceTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::budgets::{BudgetProgress, BudgetServiceTrait};
use crate::categories::CategoryKind;
use crate::constants::DEFAULT_CURRENCY;
use crate::errors::Result;
use crate::fx::CurrencyConverterTrait;
use crate::transactions::{TransactionDetails, TransactionFilter, TransactionRepositoryTrait};
use crate::users::UserRepositoryTrait;
use crate::utils::time_utils::{first_day_months_ago, first_of_month, next_month};

pub struct ReportsService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    budget_service: Arc<dyn BudgetServiceTrait>,
    converter: Arc<dyn CurrencyConverterTrait>,
}

impl ReportsService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        budget_service: Arc<dyn BudgetServiceTrait>,
        converter: Arc<dyn CurrencyConverterTrait>,
    ) -> Self {
        Self {
            account_repository,
            transaction_repository,
            user_repository,
            budget_service,
            converter,
        }
    }

    fn transactions_since(&self, user_id: &str, start: NaiveDate) -> Result<Vec<TransactionDetails>> {
        let filter = TransactionFilter {
            start_date: Some(start),
            ..Default::default()
        };
        self.transaction_repository.list(user_id, &filter)
    }
}

#[async_trait]
impl ReportsServiceTrait for ReportsService {
    async fn dashboard_summary(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<DashboardSummary> {
        let accounts = self.account_repository.list(user_id)?;
        let total_transactions = self.transaction_repository.count_for_user(user_id)?;

        let preferred = match self.user_repository.get_preferences(user_id) {
            Ok(preferences) => Some(preferences.currency),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };
        let primary_currency = preferred
            .filter(|c| !c.is_empty())
            .or_else(|| accounts.first().map(|a| a.currency.clone()))
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let mut total_balance = Decimal::ZERO;
        for account in &accounts {
            total_balance += self
                .converter
                .convert_amount(account.current_balance, &account.currency, &primary_currency)
                .await;
        }

        let filter = TransactionFilter {
            start_date: Some(first_of_month(today)),
            end_date: Some(today),
            ..Default::default()
        };
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for details in self.transaction_repository.list(user_id, &filter)? {
            let amount = self
                .converter
                .convert_amount(
                    details.transaction.amount,
                    &details.transaction.currency,
                    &primary_currency,
                )
                .await;
            if details.is_expense() {
                expense += amount;
            } else {
                income += amount;
            }
        }

        debug!(
            "Dashboard summary for user {}: {} accounts in {}",
            user_id,
            accounts.len(),
            primary_currency
        );

        Ok(DashboardSummary {
            total_accounts: accounts.len(),
            total_transactions,
            total_balance,
            monthly_income: income,
            monthly_expense: expense,
            monthly_net: income - expense,
            primary_currency,
        })
    }

    fn accounts_overview(&self, user_id: &str) -> Result<Vec<AccountOverview>> {
        Ok(self
            .account_repository
            .list(user_id)?
            .into_iter()
            .map(|account| AccountOverview {
                account_type: account.account_type.label().to_string(),
                name: account.name,
                current_balance: account.current_balance,
                currency: account.currency,
            })
            .collect())
    }

    fn spending_by_category(
        &self,
        user_id: &str,
        today: NaiveDate,
        months: Option<i64>,
    ) -> Result<SpendingReport> {
        let months = clamp_months(months, DEFAULT_SPENDING_MONTHS);
        let start_date = first_day_months_ago(today, months - 1);

        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for details in self.transactions_since(user_id, start_date)? {
            if !details.is_expense() {
                continue;
            }
            if let Some(name) = details.category_name {
                *totals.entry(name).or_default() += details.transaction.amount;
            }
        }
        let mut totals: Vec<(String, Decimal)> = totals.into_iter().collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(SpendingReport {
            labels: totals.iter().map(|(name, _)| name.clone()).collect(),
            values: totals.into_iter().map(|(_, total)| total).collect(),
            months,
            start_date,
        })
    }

    fn cashflow(
        &self,
        user_id: &str,
        today: NaiveDate,
        months: Option<i64>,
    ) -> Result<CashflowReport> {
        let months = clamp_months(months, DEFAULT_CASHFLOW_MONTHS);
        let start_date = first_day_months_ago(today, months - 1);

        let mut buckets: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
        let mut month = start_date;
        for _ in 0..months {
            buckets.insert(month, (Decimal::ZERO, Decimal::ZERO));
            month = next_month(month);
        }

        for details in self.transactions_since(user_id, start_date)? {
            let key = first_of_month(details.transaction.date);
            let Some(bucket) = buckets.get_mut(&key) else {
                continue;
            };
            match details.category_type {
                Some(CategoryKind::Income) => bucket.0 += details.transaction.amount,
                Some(CategoryKind::Expense) => bucket.1 += details.transaction.amount,
                None => {}
            }
        }

        let mut report = CashflowReport {
            labels: Vec::with_capacity(buckets.len()),
            income: Vec::with_capacity(buckets.len()),
            expense: Vec::with_capacity(buckets.len()),
            start_date,
        };
        for (month, (income, expense)) in buckets {
            report
                .labels
                .push(format!("{} {}", month.format("%b"), month.year()));
            report.income.push(income);
            report.expense.push(expense);
        }
        Ok(report)
    }

    fn budget_progress(
        &self,
        user_id: &str,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> Result<Vec<BudgetProgress>> {
        self.budget_service.progress_for_user(user_id, today, limit)
    }
}
