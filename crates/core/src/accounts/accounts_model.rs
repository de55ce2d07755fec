//! Account domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ledger::{EntityKind, Owned};
use crate::utils::money::{has_money_scale, normalize_currency};
use crate::{errors::ValidationError, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    Asset,
    Liability,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASSET" => Ok(AccountType::Asset),
            "LIABILITY" => Ok(AccountType::Liability),
            other => Err(Error::invalid(format!("Unknown account type: {}", other))),
        }
    }
}

/// Domain model representing an account in the ledger.
///
/// `current_balance` is stored but derived: it always equals
/// `initial_balance` plus the signed amounts of the account's transactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl Owned for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub account_type: AccountType,
    pub currency: String,
    pub initial_balance: Decimal,
    #[serde(default)]
    pub description: String,
}

impl NewAccount {
    /// Validates the new account data and normalizes the currency code.
    pub fn validate(&mut self) -> Result<()> {
        self.name = self.name.trim().to_string();
        self.currency = validate_account_fields(&self.name, &self.currency, self.initial_balance)?;
        Ok(())
    }
}

/// Input model for updating an existing account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: Option<String>,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub initial_balance: Decimal,
    #[serde(default)]
    pub description: String,
}

impl AccountUpdate {
    /// Validates the account update data and normalizes the currency code.
    pub fn validate(&mut self) -> Result<()> {
        if self.id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        self.name = self.name.trim().to_string();
        self.currency = validate_account_fields(&self.name, &self.currency, self.initial_balance)?;
        Ok(())
    }
}

fn validate_account_fields(name: &str, currency: &str, initial_balance: Decimal) -> Result<String> {
    if name.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Account name cannot be empty".to_string(),
        )));
    }
    if initial_balance.is_sign_negative() && !initial_balance.is_zero() {
        return Err(Error::invalid("Initial balance cannot be negative"));
    }
    if !has_money_scale(initial_balance) {
        return Err(Error::invalid(
            "Initial balance cannot have more than 2 decimal places",
        ));
    }
    normalize_currency(currency)
        .ok_or_else(|| Error::invalid(format!("Invalid currency code: {}", currency)))
}
