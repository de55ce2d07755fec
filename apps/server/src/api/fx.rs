use std::str::FromStr;
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tallybook_core::{constants::DEFAULT_CURRENCY, fx::CurrencyConverterTrait};

#[derive(Debug, Deserialize)]
struct ConvertQuery {
    amount: String,
    #[serde(default)]
    from: String,
    #[serde(default)]
    to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertResponse {
    amount: Decimal,
    from: String,
    to: String,
    rate: Decimal,
    converted: Decimal,
}

fn display_code(raw: &str) -> String {
    match raw.trim() {
        "" => DEFAULT_CURRENCY.to_string(),
        code => code.to_ascii_uppercase(),
    }
}

/// Never fails on rate lookup problems; the fallback rate is 1.
async fn convert(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertQuery>,
) -> ApiResult<Json<ConvertResponse>> {
    let amount = Decimal::from_str(query.amount.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid amount: {}", query.amount)))?;
    let rate = state.currency_converter.rate(&query.from, &query.to).await;
    let converted = state
        .currency_converter
        .convert_amount(amount, &query.from, &query.to)
        .await;
    Ok(Json(ConvertResponse {
        amount,
        from: display_code(&query.from),
        to: display_code(&query.to),
        rate,
        converted,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/fx/convert", get(convert))
}
