use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{Error, Result};

/// Header names for each transaction field. `None` disables an optional
/// column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportColumns {
    pub date: String,
    pub amount: String,
    pub description: Option<String>,
    pub account: Option<String>,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub tags: Option<String>,
    pub notes: Option<String>,
}

impl Default for ImportColumns {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            amount: "amount".to_string(),
            description: Some("description".to_string()),
            account: Some("account".to_string()),
            category: Some("category".to_string()),
            currency: Some("currency".to_string()),
            tags: Some("tags".to_string()),
            notes: Some("notes".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    pub delimiter: char,
    /// strftime pattern, e.g. `%d/%m/%Y`.
    pub date_format: String,
    pub columns: ImportColumns,
    pub default_account_id: Option<String>,
    pub default_category_id: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_format: "%Y-%m-%d".to_string(),
            columns: ImportColumns::default(),
            default_account_id: None,
            default_category_id: None,
        }
    }
}

impl ImportConfig {
    /// Checks the parser settings and returns the delimiter byte.
    pub fn validate(&mut self) -> Result<u8> {
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            return Err(Error::invalid(format!(
                "Unsupported delimiter: {:?}",
                self.delimiter
            )));
        }
        self.date_format = self.date_format.trim().to_string();
        if self.date_format.is_empty() {
            return Err(Error::invalid("Date format cannot be empty"));
        }
        if self.columns.date.trim().is_empty() || self.columns.amount.trim().is_empty() {
            return Err(Error::invalid("Date and amount columns are required"));
        }
        self.default_account_id = self.default_account_id.take().filter(|v| !v.trim().is_empty());
        self.default_category_id = self
            .default_category_id
            .take()
            .filter(|v| !v.trim().is_empty());
        Ok(self.delimiter as u8)
    }
}

/// A rejected row, numbered as in the file (header is row 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

impl fmt::Display for ImportRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub created: usize,
    pub skipped: usize,
    /// First few row errors, formatted as `Row <n>: <cause>`.
    pub errors: Vec<String>,
}
