use std::sync::Arc;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use tallybook_core::categories::{
    Category, CategoryServiceTrait, CategoryUpdate, CategoryWithChildren, NewCategory,
};

/// Get all categories (flat list)
async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.category_service.list_categories(&user.user_id)?;
    Ok(Json(categories))
}

/// Get categories organized hierarchically
async fn get_categories_hierarchical(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<CategoryWithChildren>>> {
    let tree = state
        .category_service
        .get_categories_hierarchical(&user.user_id)?;
    Ok(Json(tree))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let created = state
        .category_service
        .create_category(&user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(mut payload): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    payload.id = id;
    let updated = state
        .category_service
        .update_category(&user.user_id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state
        .category_service
        .delete_category(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/tree", get(get_categories_hierarchical))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
}
