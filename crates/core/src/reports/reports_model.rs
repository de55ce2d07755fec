use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SPENDING_MONTHS: u32 = 1;
pub const DEFAULT_CASHFLOW_MONTHS: u32 = 6;
pub const MAX_REPORT_MONTHS: u32 = 12;

/// Clamps a requested month count to `1..=12`, using `default` when absent.
pub fn clamp_months(requested: Option<i64>, default: u32) -> u32 {
    match requested {
        Some(months) => months.clamp(1, MAX_REPORT_MONTHS as i64) as u32,
        None => default,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_accounts: usize,
    pub total_transactions: i64,
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub monthly_net: Decimal,
    pub primary_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub name: String,
    pub current_balance: Decimal,
    pub currency: String,
    pub account_type: String,
}

/// Expense totals per category name, largest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpendingReport {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
    pub months: u32,
    pub start_date: NaiveDate,
}

/// Income and expense per calendar month, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashflowReport {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
    pub start_date: NaiveDate,
}
