use chrono::{NaiveDate, NaiveDateTime};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_BUDGET_PERCENTAGE;
use crate::errors::{Error, Result};
use crate::ledger::{EntityKind, Owned};
use crate::utils::money::has_money_scale;
use crate::utils::time_utils::{month_bounds, year_bounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Yearly,
    Custom,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "MONTHLY",
            BudgetPeriod::Yearly => "YEARLY",
            BudgetPeriod::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(BudgetPeriod::Monthly),
            "YEARLY" => Ok(BudgetPeriod::Yearly),
            "CUSTOM" => Ok(BudgetPeriod::Custom),
            other => Err(Error::invalid(format!("Unknown budget period: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl Budget {
    /// Inclusive date range the budget currently covers.
    ///
    /// Monthly and yearly budgets follow the calendar month/year of `today`;
    /// custom budgets use their own dates, with a missing end meaning a
    /// single-day range.
    pub fn active_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self.period {
            BudgetPeriod::Monthly => month_bounds(today),
            BudgetPeriod::Yearly => year_bounds(today),
            BudgetPeriod::Custom => (self.start_date, self.end_date.unwrap_or(self.start_date)),
        }
    }
}

impl Owned for Budget {
    const KIND: EntityKind = EntityKind::Budget;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub period: BudgetPeriod,
    /// Defaults to the user's current date.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewBudget {
    pub fn validate(&mut self, today: NaiveDate) -> Result<()> {
        let start = *self.start_date.get_or_insert(today);
        self.name = self.name.trim().to_string();
        self.category_id = self.category_id.take().filter(|c| !c.trim().is_empty());
        self.end_date = validate_budget_fields(&self.name, self.amount, self.period, start, self.end_date)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    /// May be omitted when the id is supplied out of band.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category_id: Option<String>,
    pub amount: Decimal,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl BudgetUpdate {
    pub fn validate(&mut self) -> Result<()> {
        self.name = self.name.trim().to_string();
        self.category_id = self.category_id.take().filter(|c| !c.trim().is_empty());
        self.end_date = validate_budget_fields(
            &self.name,
            self.amount,
            self.period,
            self.start_date,
            self.end_date,
        )?;
        Ok(())
    }
}

/// Returns the end date to store: kept for custom periods, dropped otherwise.
fn validate_budget_fields(
    name: &str,
    amount: Decimal,
    period: BudgetPeriod,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<Option<NaiveDate>> {
    if name.is_empty() {
        return Err(Error::invalid("Budget name cannot be empty"));
    }
    if amount <= Decimal::ZERO {
        return Err(Error::invalid("Budget amount must be greater than zero."));
    }
    if !has_money_scale(amount) {
        return Err(Error::invalid(
            "Budget amount cannot have more than 2 decimal places.",
        ));
    }
    match period {
        BudgetPeriod::Custom => {
            let end = end.ok_or_else(|| Error::invalid("Custom budgets require an end date."))?;
            if end < start {
                return Err(Error::invalid("End date must be after the start date."));
            }
            Ok(Some(end))
        }
        BudgetPeriod::Monthly | BudgetPeriod::Yearly => Ok(None),
    }
}

/// Evaluated state of a budget over its active period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget: Budget,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: f64,
    pub over_budget: bool,
}

impl BudgetProgress {
    pub fn new(budget: Budget, period: (NaiveDate, NaiveDate), spent: Decimal) -> Self {
        let percentage = Self::percentage_of(spent, budget.amount);
        Self {
            period_start: period.0,
            period_end: period.1,
            remaining: budget.amount - spent,
            over_budget: spent > budget.amount,
            spent,
            percentage,
            budget,
        }
    }

    /// `spent / amount * 100`, capped at 999 and 0 for a zero target.
    pub fn percentage_of(spent: Decimal, amount: Decimal) -> f64 {
        if amount.is_zero() {
            return 0.0;
        }
        let ratio = (spent / amount * Decimal::ONE_HUNDRED).min(Decimal::from(MAX_BUDGET_PERCENTAGE));
        ratio.to_f64().unwrap_or(0.0)
    }
}
