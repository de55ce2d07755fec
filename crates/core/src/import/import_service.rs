use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

use super::amount_parser::parse_amount;
use super::csv_reader::{read_csv, CsvRow, CsvTable};
use super::import_model::{ImportConfig, ImportResult, ImportRowError};
use super::import_traits::ImportServiceTrait;
use crate::accounts::{Account, AccountRepositoryTrait};
use crate::categories::{Category, CategoryRepositoryTrait};
use crate::constants::{DEFAULT_CURRENCY, MAX_REPORTED_IMPORT_ERRORS};
use crate::errors::{Error, Result, ValidationError};
use crate::ledger::ensure_reference_owned;
use crate::transactions::{
    normalize_tags, NewTransaction, RecurrenceInterval, TransactionServiceTrait,
};
use crate::users::UserRepositoryTrait;

/// Column positions resolved against the file header.
struct ColumnMap {
    date: usize,
    amount: usize,
    description: Option<usize>,
    account: Option<usize>,
    category: Option<usize>,
    currency: Option<usize>,
    tags: Option<usize>,
    notes: Option<usize>,
}

impl ColumnMap {
    fn resolve(table: &CsvTable, config: &ImportConfig) -> Result<Self> {
        let required = |name: &str| {
            table.column_index(name).ok_or_else(|| {
                Error::invalid(format!("CSV header is missing the '{}' column", name.trim()))
            })
        };
        let optional = |name: &Option<String>| {
            name.as_deref()
                .filter(|n| !n.trim().is_empty())
                .and_then(|n| table.column_index(n))
        };
        let columns = &config.columns;
        Ok(Self {
            date: required(columns.date.as_str())?,
            amount: required(columns.amount.as_str())?,
            description: optional(&columns.description),
            account: optional(&columns.account),
            category: optional(&columns.category),
            currency: optional(&columns.currency),
            tags: optional(&columns.tags),
            notes: optional(&columns.notes),
        })
    }
}

/// Lookup tables for one import run.
struct ImportContext {
    accounts: HashMap<String, Account>,
    categories: HashMap<String, Category>,
    default_account: Option<Account>,
    default_category: Option<Category>,
    preferred_currency: String,
}

impl ImportContext {
    fn account_for(&self, name: &str) -> std::result::Result<&Account, String> {
        if name.is_empty() {
            return self
                .default_account
                .as_ref()
                .ok_or_else(|| "Missing account".to_string());
        }
        self.accounts
            .get(&name.to_lowercase())
            .ok_or_else(|| format!("Unknown account: {}", name))
    }

    fn category_for(&self, name: &str) -> std::result::Result<Option<&Category>, String> {
        if name.is_empty() {
            return Ok(self.default_category.as_ref());
        }
        match self.categories.get(&name.to_lowercase()) {
            Some(category) if category.is_expense() => Ok(Some(category)),
            Some(_) => Err(format!("Category must be an expense: {}", name)),
            None => Err(format!("Unknown category: {}", name)),
        }
    }
}

fn unknown_default(error: Error, label: &str, id: &str) -> Error {
    if error.is_not_found() {
        Error::invalid(format!("Unknown default {}: {}", label, id))
    } else {
        error
    }
}

/// Turns CSV files into transactions.
pub struct ImportService {
    transaction_service: Arc<dyn TransactionServiceTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl ImportService {
    pub fn new(
        transaction_service: Arc<dyn TransactionServiceTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            transaction_service,
            account_repository,
            category_repository,
            user_repository,
        }
    }

    fn load_context(&self, user_id: &str, config: &ImportConfig) -> Result<ImportContext> {
        let mut accounts = HashMap::new();
        for account in self.account_repository.list(user_id)? {
            accounts.entry(account.name.to_lowercase()).or_insert(account);
        }
        let mut categories = HashMap::new();
        for category in self.category_repository.list(user_id)? {
            categories
                .entry(category.name.to_lowercase())
                .or_insert(category);
        }

        let default_account = match config.default_account_id.as_deref() {
            Some(id) => {
                let account = self
                    .account_repository
                    .get_by_id(id)
                    .map_err(|e| unknown_default(e, "account", id))?;
                ensure_reference_owned(&account, user_id)?;
                Some(account)
            }
            None => None,
        };
        let default_category = match config.default_category_id.as_deref() {
            Some(id) => {
                let category = self
                    .category_repository
                    .get_by_id(id)
                    .map_err(|e| unknown_default(e, "category", id))?;
                ensure_reference_owned(&category, user_id)?;
                if !category.is_expense() {
                    return Err(Error::invalid(
                        "The default category must be an expense category.",
                    ));
                }
                Some(category)
            }
            None => None,
        };

        let preferred_currency = match self.user_repository.get_preferences(user_id) {
            Ok(preferences) => preferences.currency,
            Err(e) if e.is_not_found() => DEFAULT_CURRENCY.to_string(),
            Err(e) => return Err(e),
        };

        Ok(ImportContext {
            accounts,
            categories,
            default_account,
            default_category,
            preferred_currency,
        })
    }

    /// Builds the transaction for one row, or the reason it is rejected.
    fn build_row(
        &self,
        user_id: &str,
        row: &CsvRow,
        columns: &ColumnMap,
        config: &ImportConfig,
        context: &ImportContext,
    ) -> std::result::Result<NewTransaction, String> {
        let raw_date = row.cell(Some(columns.date));
        if raw_date.is_empty() {
            return Err("Missing date".to_string());
        }
        let date = NaiveDate::parse_from_str(raw_date, &config.date_format).map_err(|_| {
            format!(
                "Invalid date '{}' (expected {})",
                raw_date, config.date_format
            )
        })?;

        let amount = parse_amount(row.cell(Some(columns.amount)))?;
        let account = context.account_for(row.cell(columns.account))?;
        let category = context.category_for(row.cell(columns.category))?;

        let currency = match row.cell(columns.currency) {
            "" if !account.currency.is_empty() => account.currency.clone(),
            "" => context.preferred_currency.clone(),
            explicit => explicit.to_uppercase(),
        };

        let transaction = NewTransaction {
            id: None,
            user_id: user_id.to_string(),
            account_id: account.id.clone(),
            category_id: category.map(|c| c.id.clone()),
            date,
            amount,
            currency,
            description: row.cell(columns.description).to_string(),
            notes: row.cell(columns.notes).to_string(),
            tags: normalize_tags(row.cell(columns.tags)),
            attachment: None,
            is_recurring: false,
            recurrence_interval: RecurrenceInterval::None,
            recurrence_end_date: None,
        };

        self.transaction_service
            .prepare_transaction(user_id, transaction)
            .map_err(|e| match e {
                Error::Validation(ValidationError::InvalidInput(message)) => message,
                Error::Validation(inner) => inner.to_string(),
                other => other.to_string(),
            })
    }
}

#[async_trait]
impl ImportServiceTrait for ImportService {
    async fn import_csv(
        &self,
        user_id: &str,
        content: &[u8],
        config: ImportConfig,
    ) -> Result<ImportResult> {
        let mut config = config;
        let delimiter = config.validate()?;
        let table = read_csv(content, delimiter)?;
        let columns = ColumnMap::resolve(&table, &config)?;
        let context = self.load_context(user_id, &config)?;

        let mut accepted = Vec::new();
        let mut rejected: Vec<ImportRowError> = Vec::new();
        for row in &table.rows {
            match self.build_row(user_id, row, &columns, &config, &context) {
                Ok(transaction) => accepted.push(transaction),
                Err(message) => {
                    debug!("Skipping import row {}: {}", row.number, message);
                    rejected.push(ImportRowError {
                        row: row.number,
                        message,
                    });
                }
            }
        }

        let created = if accepted.is_empty() {
            0
        } else {
            self.transaction_service
                .create_transactions(user_id, accepted)
                .await?
        };

        info!(
            "CSV import for user {}: {} created, {} skipped",
            user_id,
            created,
            rejected.len()
        );

        Ok(ImportResult {
            created,
            skipped: rejected.len(),
            errors: rejected
                .iter()
                .take(MAX_REPORTED_IMPORT_ERRORS)
                .map(ToString::to_string)
                .collect(),
        })
    }
}
