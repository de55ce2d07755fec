use crate::errors::{Error, Result};

/// Ledger entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Category,
    Transaction,
    Budget,
}

/// Records that can block the deletion of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependent {
    Transactions,
    ChildCategories,
    Budgets,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Account => "account",
            EntityKind::Category => "category",
            EntityKind::Transaction => "transaction",
            EntityKind::Budget => "budget",
        }
    }

    /// Dependents that must be absent before the entity can be deleted,
    /// in the order they are checked.
    pub fn blocking_dependents(&self) -> &'static [Dependent] {
        match self {
            EntityKind::Account => &[Dependent::Transactions],
            EntityKind::Category => &[Dependent::ChildCategories, Dependent::Transactions],
            EntityKind::Transaction | EntityKind::Budget => &[],
        }
    }

    fn blocked_message(&self, dependent: Dependent) -> String {
        match (self, dependent) {
            (EntityKind::Category, Dependent::ChildCategories) => {
                "Cannot delete a category that has sub-categories.".to_string()
            }
            (EntityKind::Category, Dependent::Transactions) => {
                "Cannot delete a category linked to transactions.".to_string()
            }
            (kind, Dependent::Transactions) => {
                format!("Cannot delete {} with existing transactions.", kind.label())
            }
            (kind, Dependent::ChildCategories) => {
                format!("Cannot delete {} with child categories.", kind.label())
            }
            (kind, Dependent::Budgets) => {
                format!("Cannot delete {} used by budgets.", kind.label())
            }
        }
    }
}

/// Number of records depending on an entity, per dependent kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DependentCounts {
    pub transactions: i64,
    pub child_categories: i64,
    pub budgets: i64,
}

impl DependentCounts {
    pub fn count(&self, dependent: Dependent) -> i64 {
        match dependent {
            Dependent::Transactions => self.transactions,
            Dependent::ChildCategories => self.child_categories,
            Dependent::Budgets => self.budgets,
        }
    }
}

/// Fails with `ConstraintViolation` when any blocking dependent exists.
pub fn ensure_deletable(kind: EntityKind, counts: &DependentCounts) -> Result<()> {
    for dependent in kind.blocking_dependents() {
        if counts.count(*dependent) > 0 {
            return Err(Error::ConstraintViolation(kind.blocked_message(*dependent)));
        }
    }
    Ok(())
}

/// An entity scoped to a single user.
pub trait Owned {
    const KIND: EntityKind;

    fn entity_id(&self) -> &str;

    fn owner_id(&self) -> &str;
}

/// Direct access check: another user's entity is reported as not found.
pub fn ensure_owned<T: Owned>(entity: T, user_id: &str) -> Result<T> {
    if entity.owner_id() == user_id {
        Ok(entity)
    } else {
        Err(Error::not_found(T::KIND.label(), entity.entity_id()))
    }
}

/// Reference check: pointing at another user's entity is a validation error.
pub fn ensure_reference_owned<T: Owned>(entity: &T, user_id: &str) -> Result<()> {
    if entity.owner_id() == user_id {
        Ok(())
    } else {
        let label = T::KIND.label();
        let mut capitalized = label.to_string();
        if let Some(first) = capitalized.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Err(Error::invalid(format!(
            "{} must belong to the same user.",
            capitalized
        )))
    }
}
