//! Shared ownership and dependency rules for ledger entities.
//!
//! Accounts, categories, transactions and budgets follow the same lifecycle
//! rules (owner scoping, reference checks, blocked deletes). The rules are
//! expressed once over an [`EntityKind`] descriptor instead of per entity.

mod ledger_rules;

pub use ledger_rules::{
    ensure_deletable, ensure_owned, ensure_reference_owned, Dependent, DependentCounts,
    EntityKind, Owned,
};
