use std::sync::Arc;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tallybook_core::{
    errors::Error as CoreError,
    export::{suggested_file_name, ExportFormat, ExportServiceTrait},
    import::{ImportConfig, ImportResult, ImportServiceTrait},
    transactions::{
        NewTransaction, Transaction, TransactionDetails, TransactionFilter,
        TransactionServiceTrait, TransactionUpdate,
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest {
    /// Raw CSV text including the header row.
    content: String,
    #[serde(default)]
    config: ImportConfig,
}

#[derive(Debug, Deserialize)]
struct ExportParams {
    format: Option<String>,
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Vec<TransactionDetails>>> {
    let transactions = state
        .transaction_service
        .list_transactions(&user.user_id, &filter)?;
    Ok(Json(transactions))
}

async fn get_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<Transaction>> {
    let transaction = state
        .transaction_service
        .get_transaction(&user.user_id, &id)?;
    Ok(Json(transaction))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let created = state
        .transaction_service
        .create_transaction(&user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(mut payload): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    payload.id = id;
    let updated = state
        .transaction_service
        .update_transaction(&user.user_id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state
        .transaction_service
        .delete_transaction(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rejected rows are reported in the result body; only file-level problems fail the request.
async fn import_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ImportRequest>,
) -> ApiResult<Json<ImportResult>> {
    let result = state
        .import_service
        .import_csv(&user.user_id, payload.content.as_bytes(), payload.config)
        .await?;
    tracing::info!(
        "Imported {} transactions for {} ({} skipped)",
        result.created,
        user.user_id,
        result.skipped
    );
    Ok(Json(result))
}

async fn export_transactions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ExportParams>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Response> {
    let format = match params.format.as_deref() {
        Some(raw) => raw.parse::<ExportFormat>()?,
        None => ExportFormat::Csv,
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        suggested_file_name(Utc::now(), format)
    );

    let response = match format {
        ExportFormat::Csv => {
            let body = state.export_service.export_csv(&user.user_id, &filter)?;
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        ExportFormat::Json => {
            let rows = state.export_service.export_json(&user.user_id, &filter)?;
            let body = serde_json::to_string(&rows).map_err(CoreError::from)?;
            (
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
    };
    Ok(response)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/import", post(import_transactions))
        .route("/transactions/export", get(export_transactions))
        .route(
            "/transactions/{id}",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}
