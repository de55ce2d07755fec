//! Transaction domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::categories::CategoryKind;
use crate::errors::{Error, Result, ValidationError};
use crate::ledger::{EntityKind, Owned};
use crate::utils::money::has_money_scale;

/// File types accepted as receipt attachments.
pub const ALLOWED_ATTACHMENT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceInterval {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceInterval::None => "NONE",
            RecurrenceInterval::Daily => "DAILY",
            RecurrenceInterval::Weekly => "WEEKLY",
            RecurrenceInterval::Monthly => "MONTHLY",
            RecurrenceInterval::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for RecurrenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" | "" => Ok(RecurrenceInterval::None),
            "DAILY" => Ok(RecurrenceInterval::Daily),
            "WEEKLY" => Ok(RecurrenceInterval::Weekly),
            "MONTHLY" => Ok(RecurrenceInterval::Monthly),
            "YEARLY" => Ok(RecurrenceInterval::Yearly),
            other => Err(Error::invalid(format!(
                "Unknown recurrence interval: {}",
                other
            ))),
        }
    }
}

/// The balance effect of an amount under a category: expenses are
/// negative, income and uncategorized amounts are positive.
pub fn signed_amount(amount: Decimal, kind: Option<CategoryKind>) -> Decimal {
    match kind {
        Some(CategoryKind::Expense) => -amount,
        _ => amount,
    }
}

/// Splits a comma separated tag string, trims entries, drops blanks and
/// joins the rest with `", "`.
pub fn normalize_tags(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub notes: String,
    pub tags: String,
    pub attachment: Option<String>,
    pub is_recurring: bool,
    pub recurrence_interval: RecurrenceInterval,
    pub recurrence_end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Owned for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// A transaction joined with the names and type it is displayed with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub account_name: String,
    pub category_name: Option<String>,
    pub category_type: Option<CategoryKind>,
}

impl TransactionDetails {
    pub fn is_expense(&self) -> bool {
        self.category_type.is_some_and(|k| k.is_expense())
    }

    pub fn signed_amount(&self) -> Decimal {
        signed_amount(self.transaction.amount, self.category_type)
    }
}

/// Input model for creating a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
    /// Blank means "use the account's currency".
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: String,
    pub attachment: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_interval: RecurrenceInterval,
    pub recurrence_end_date: Option<NaiveDate>,
}

impl NewTransaction {
    /// Field-level checks that need no lookups. Normalizes tags and text.
    pub fn validate(&mut self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "accountId".to_string(),
            )));
        }
        self.category_id = self.category_id.take().filter(|c| !c.trim().is_empty());
        self.description = self.description.trim().to_string();
        self.notes = self.notes.trim().to_string();
        self.tags = normalize_tags(&self.tags);
        validate_entry_fields(
            self.amount,
            self.date,
            self.is_recurring,
            self.recurrence_interval,
            self.recurrence_end_date,
            self.attachment.as_deref(),
        )
    }
}

/// Input model for replacing the editable fields of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    /// May be omitted when the id is supplied out of band.
    #[serde(default)]
    pub id: String,
    pub account_id: String,
    pub category_id: Option<String>,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: String,
    pub attachment: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_interval: RecurrenceInterval,
    pub recurrence_end_date: Option<NaiveDate>,
}

impl TransactionUpdate {
    pub fn validate(&mut self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if self.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "accountId".to_string(),
            )));
        }
        self.category_id = self.category_id.take().filter(|c| !c.trim().is_empty());
        self.description = self.description.trim().to_string();
        self.notes = self.notes.trim().to_string();
        self.tags = normalize_tags(&self.tags);
        validate_entry_fields(
            self.amount,
            self.date,
            self.is_recurring,
            self.recurrence_interval,
            self.recurrence_end_date,
            self.attachment.as_deref(),
        )
    }
}

fn validate_entry_fields(
    amount: Decimal,
    date: NaiveDate,
    is_recurring: bool,
    interval: RecurrenceInterval,
    end_date: Option<NaiveDate>,
    attachment: Option<&str>,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::invalid("Amount must be greater than zero."));
    }
    if !has_money_scale(amount) {
        return Err(Error::invalid(
            "Amount cannot have more than 2 decimal places.",
        ));
    }
    if is_recurring && interval == RecurrenceInterval::None {
        return Err(Error::invalid(
            "Select an interval for recurring transactions.",
        ));
    }
    if interval != RecurrenceInterval::None && end_date.is_some_and(|end| end < date) {
        return Err(Error::invalid(
            "End date cannot be before the transaction date.",
        ));
    }
    if let Some(attachment) = attachment {
        let extension = attachment
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_ATTACHMENT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::invalid(format!(
                "Attachment must be one of: {}",
                ALLOWED_ATTACHMENT_EXTENSIONS.join(", ")
            )));
        }
    }
    Ok(())
}

/// Filters for listing and exporting transactions. All fields are optional
/// and combine with AND.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub account_id: Option<String>,
    pub category_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Comma separated; every listed tag must be present.
    pub tags: Option<String>,
    /// Case-insensitive substring of description or notes.
    pub search: Option<String>,
}

impl TransactionFilter {
    pub fn requested_tags(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when every requested tag appears as a whole entry of `tags`.
    pub fn matches_tags(&self, tags: &str) -> bool {
        let requested = self.requested_tags();
        if requested.is_empty() {
            return true;
        }
        let present: Vec<String> = tags
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        requested.iter().all(|tag| present.contains(tag))
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
