use std::sync::Arc;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use tallybook_core::{
    budgets::{Budget, BudgetProgress, BudgetServiceTrait, BudgetUpdate, NewBudget},
    users::UserServiceTrait,
};

#[derive(Debug, Deserialize)]
pub(super) struct LimitQuery {
    limit: Option<String>,
}

impl LimitQuery {
    /// Unparseable limits are ignored.
    pub(super) fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Budget>>> {
    let budgets = state.budget_service.list_budgets(&user.user_id)?;
    Ok(Json(budgets))
}

async fn get_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Budget>> {
    let budget = state.budget_service.get_budget(&user.user_id, &id)?;
    Ok(Json(budget))
}

/// Without a start date the budget starts on the user's local today.
async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<NewBudget>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let today = state.user_service.today_for(&user.user_id)?;
    let created = state
        .budget_service
        .create_budget(&user.user_id, payload, today)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(mut payload): Json<BudgetUpdate>,
) -> ApiResult<Json<Budget>> {
    payload.id = id;
    let updated = state
        .budget_service
        .update_budget(&user.user_id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state
        .budget_service
        .delete_budget(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_budget_progress(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<BudgetProgress>> {
    let today = state.user_service.today_for(&user.user_id)?;
    let progress = state
        .budget_service
        .evaluate_budget(&user.user_id, &id, today)?;
    Ok(Json(progress))
}

async fn list_budget_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<BudgetProgress>>> {
    let today = state.user_service.today_for(&user.user_id)?;
    let progress = state
        .budget_service
        .progress_for_user(&user.user_id, today, query.limit())?;
    Ok(Json(progress))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/progress", get(list_budget_progress))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{id}/progress", get(get_budget_progress))
}
