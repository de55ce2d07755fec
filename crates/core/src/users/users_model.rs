//! User and preference domain models.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_LANGUAGE, DEFAULT_TIMEZONE};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::money::normalize_currency;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "username".to_string(),
            )));
        }
        if self.password_hash.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "password".to_string(),
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::invalid(format!("Unknown theme: {}", other))),
        }
    }
}

/// Per-user display and locale settings. Exactly one row per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub currency: String,
    pub timezone: String,
    pub language: String,
    pub theme: Theme,
    pub updated_at: NaiveDateTime,
}

impl UserPreference {
    /// The preferences every new user starts with.
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            theme: Theme::Light,
            updated_at: Utc::now().naive_utc(),
        }
    }

    /// Parsed timezone, falling back to UTC for values stored before validation.
    pub fn tz(&self) -> Tz {
        self.timezone.parse::<Tz>().unwrap_or(chrono_tz::UTC)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdate {
    pub currency: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub theme: Option<Theme>,
}

impl PreferenceUpdate {
    /// Validates the update and applies it on top of `current`.
    pub fn apply_to(&self, current: &UserPreference) -> Result<UserPreference> {
        let mut next = current.clone();
        if let Some(currency) = &self.currency {
            next.currency = normalize_currency(currency).ok_or_else(|| {
                Error::invalid("Use a three-letter currency code (e.g. USD).")
            })?;
        }
        if let Some(timezone) = &self.timezone {
            let timezone = timezone.trim();
            timezone
                .parse::<Tz>()
                .map_err(|_| Error::invalid(format!("Unknown timezone: {}", timezone)))?;
            next.timezone = timezone.to_string();
        }
        if let Some(language) = &self.language {
            let language = language.trim();
            let well_formed = (2..=5).contains(&language.len())
                && language
                    .chars()
                    .all(|c| c.is_ascii_alphabetic() || c == '-' || c == '_');
            if !well_formed {
                return Err(Error::invalid(format!("Unsupported language: {}", language)));
            }
            next.language = language.to_string();
        }
        if let Some(theme) = self.theme {
            next.theme = theme;
        }
        next.updated_at = Utc::now().naive_utc();
        Ok(next)
    }
}
