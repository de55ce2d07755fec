use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result};
use crate::ledger::{Dependent, DependentCounts, EntityKind, Owned};

/// Income or expense. Decides the sign a category gives its transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "INCOME",
            CategoryKind::Expense => "EXPENSE",
        }
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, CategoryKind::Expense)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INCOME" => Ok(CategoryKind::Income),
            "EXPENSE" => Ok(CategoryKind::Expense),
            other => Err(Error::invalid(format!("Unknown category type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_type: CategoryKind,
    pub parent_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Category {
    pub fn is_expense(&self) -> bool {
        self.category_type.is_expense()
    }
}

impl Owned for Category {
    const KIND: EntityKind = EntityKind::Category;

    fn entity_id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Category with its children (for hierarchical display)
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithChildren {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryWithChildren>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub category_type: CategoryKind,
    pub parent_id: Option<String>,
}

impl NewCategory {
    pub fn validate(&mut self) -> Result<()> {
        self.name = validate_name(&self.name)?;
        self.parent_id = blank_to_none(self.parent_id.take());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    /// May be omitted when the id is supplied out of band.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category_type: CategoryKind,
    pub parent_id: Option<String>,
}

impl CategoryUpdate {
    pub fn validate(&mut self) -> Result<()> {
        self.name = validate_name(&self.name)?;
        self.parent_id = blank_to_none(self.parent_id.take());
        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(Error::invalid("A category cannot be its own parent."));
        }
        Ok(())
    }
}

/// A category may only switch between income and expense while nothing
/// depends on its current type.
pub fn ensure_type_change_allowed(counts: &DependentCounts) -> Result<()> {
    let blockers = [
        (Dependent::Transactions, "transactions"),
        (Dependent::ChildCategories, "sub-categories"),
        (Dependent::Budgets, "budgets"),
    ];
    for (dependent, label) in blockers {
        if counts.count(dependent) > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Cannot change the type of a category that has {}.",
                label
            )));
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid("Category name cannot be empty"));
    }
    Ok(name.to_string())
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
