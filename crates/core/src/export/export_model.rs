use chrono::{DateTime, NaiveDate, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::transactions::TransactionDetails;
use crate::utils::money::round_money;

/// Column order shared by both export formats.
pub const EXPORT_HEADER: [&str; 8] = [
    "date",
    "account",
    "category",
    "amount",
    "currency",
    "description",
    "notes",
    "tags",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::invalid(format!("Unsupported export format: {}", other))),
        }
    }
}

/// One exported transaction. `amount` is the unsigned amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub account: String,
    pub category: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub notes: String,
    pub tags: String,
}

impl From<&TransactionDetails> for ExportRow {
    fn from(details: &TransactionDetails) -> Self {
        let transaction = &details.transaction;
        Self {
            date: transaction.date,
            account: details.account_name.clone(),
            category: details.category_name.clone(),
            amount: round_money(transaction.amount).to_f64().unwrap_or(0.0),
            currency: transaction.currency.clone(),
            description: transaction.description.clone(),
            notes: transaction.notes.clone(),
            tags: transaction.tags.clone(),
        }
    }
}

/// CSV cells in [`EXPORT_HEADER`] order.
pub(crate) fn csv_record(details: &TransactionDetails) -> [String; 8] {
    let transaction = &details.transaction;
    [
        transaction.date.format("%Y-%m-%d").to_string(),
        details.account_name.clone(),
        details.category_name.clone().unwrap_or_default(),
        format!("{:.2}", round_money(transaction.amount)),
        transaction.currency.clone(),
        transaction.description.clone(),
        transaction.notes.clone(),
        transaction.tags.clone(),
    ]
}

/// Download name such as `transactions_20250314_093000.csv`.
pub fn suggested_file_name(now: DateTime<Utc>, format: ExportFormat) -> String {
    let extension = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    format!("transactions_{}.{}", now.format("%Y%m%d_%H%M%S"), extension)
}
