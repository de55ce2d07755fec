use std::sync::Arc;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use axum::{extract::State, routing::get, Extension, Json, Router};
use tallybook_core::users::{PreferenceUpdate, UserPreference, UserServiceTrait};

async fn get_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<UserPreference>> {
    let preferences = state.user_service.get_preferences(&user.user_id)?;
    Ok(Json(preferences))
}

/// Only the fields present in the body change.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<PreferenceUpdate>,
) -> ApiResult<Json<UserPreference>> {
    let updated = state
        .user_service
        .update_preferences(&user.user_id, payload)
        .await?;
    Ok(Json(updated))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/preferences", get(get_preferences).put(update_preferences))
}
