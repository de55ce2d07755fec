//! Dashboard figures derived from the ledger.

mod reports_model;
mod reports_service;
mod reports_traits;


pub use reports_model::{
    clamp_months, AccountOverview, CashflowReport, DashboardSummary, SpendingReport,
    DEFAULT_CASHFLOW_MONTHS, DEFAULT_SPENDING_MONTHS, MAX_REPORT_MONTHS,
};
pub use reports_service::ReportsService;
pub use reports_traits::ReportsServiceTrait;
