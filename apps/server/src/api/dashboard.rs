use std::sync::Arc;

use crate::{api::budgets::LimitQuery, auth::CurrentUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use tallybook_core::{
    budgets::BudgetProgress,
    reports::{
        AccountOverview, CashflowReport, DashboardSummary, ReportsServiceTrait, SpendingReport,
    },
    users::UserServiceTrait,
};

#[derive(Debug, Deserialize)]
struct MonthsQuery {
    months: Option<String>,
}

impl MonthsQuery {
    /// Non-numeric input falls back to the report's default window.
    fn months(&self) -> Option<i64> {
        self.months
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<DashboardSummary>> {
    let today = state.user_service.today_for(&user.user_id)?;
    let summary = state
        .reports_service
        .dashboard_summary(&user.user_id, today)
        .await?;
    Ok(Json(summary))
}

async fn get_accounts_overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<AccountOverview>>> {
    let overview = state.reports_service.accounts_overview(&user.user_id)?;
    Ok(Json(overview))
}

async fn get_spending(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MonthsQuery>,
) -> ApiResult<Json<SpendingReport>> {
    let today = state.user_service.today_for(&user.user_id)?;
    let report = state
        .reports_service
        .spending_by_category(&user.user_id, today, query.months())?;
    Ok(Json(report))
}

async fn get_cashflow(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MonthsQuery>,
) -> ApiResult<Json<CashflowReport>> {
    let today = state.user_service.today_for(&user.user_id)?;
    let report = state
        .reports_service
        .cashflow(&user.user_id, today, query.months())?;
    Ok(Json(report))
}

async fn get_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<BudgetProgress>>> {
    let today = state.user_service.today_for(&user.user_id)?;
    let progress = state
        .reports_service
        .budget_progress(&user.user_id, today, query.limit())?;
    Ok(Json(progress))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard/summary", get(get_summary))
        .route("/dashboard/accounts", get(get_accounts_overview))
        .route("/dashboard/spending", get(get_spending))
        .route("/dashboard/cashflow", get(get_cashflow))
        .route("/dashboard/budgets", get(get_budgets))
}
