//! Balance maintenance planning.
//!
//! Every transaction write is translated into a list of balance adjustments.
//! The storage layer applies them as in-place increments of
//! `current_balance` inside the same database transaction as the row write,
//! so the account invariant
//! `current_balance == initial_balance + sum(signed_amount)` holds at every
//! commit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The part of a transaction that affects balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub account_id: String,
    pub signed_amount: Decimal,
}

impl LedgerEntry {
    pub fn new(account_id: impl Into<String>, signed_amount: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            signed_amount,
        }
    }
}

/// An increment to apply to one account's current balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceAdjustment {
    pub account_id: String,
    pub delta: Decimal,
}

pub fn plan_create(entry: &LedgerEntry) -> Vec<BalanceAdjustment> {
    non_zero(vec![BalanceAdjustment {
        account_id: entry.account_id.clone(),
        delta: entry.signed_amount,
    }])
}

/// Same account: apply the difference. Moved account: reverse the old
/// amount on the old account and apply the new amount on the new one.
pub fn plan_update(old: &LedgerEntry, new: &LedgerEntry) -> Vec<BalanceAdjustment> {
    if old.account_id == new.account_id {
        non_zero(vec![BalanceAdjustment {
            account_id: new.account_id.clone(),
            delta: new.signed_amount - old.signed_amount,
        }])
    } else {
        non_zero(vec![
            BalanceAdjustment {
                account_id: old.account_id.clone(),
                delta: -old.signed_amount,
            },
            BalanceAdjustment {
                account_id: new.account_id.clone(),
                delta: new.signed_amount,
            },
        ])
    }
}

pub fn plan_delete(old: &LedgerEntry) -> Vec<BalanceAdjustment> {
    non_zero(vec![BalanceAdjustment {
        account_id: old.account_id.clone(),
        delta: -old.signed_amount,
    }])
}

/// One adjustment per account for a batch of new entries, ordered by
/// account id.
pub fn plan_bulk_create(entries: &[LedgerEntry]) -> Vec<BalanceAdjustment> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.account_id.as_str()).or_default() += entry.signed_amount;
    }
    non_zero(
        totals
            .into_iter()
            .map(|(account_id, delta)| BalanceAdjustment {
                account_id: account_id.to_string(),
                delta,
            })
            .collect(),
    )
}

fn non_zero(adjustments: Vec<BalanceAdjustment>) -> Vec<BalanceAdjustment> {
    adjustments
        .into_iter()
        .filter(|a| !a.delta.is_zero())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn create_applies_signed_amount() {
        let plan = plan_create(&LedgerEntry::new("a", dec!(-25.50)));
        assert_eq!(
            plan,
            vec![BalanceAdjustment {
                account_id: "a".to_string(),
                delta: dec!(-25.50)
            }]
        );
    }

    #[test]
    fn update_on_same_account_applies_difference() {
        let plan = plan_update(&LedgerEntry::new("a", dec!(500)), &LedgerEntry::new("a", dec!(-200)));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].delta, dec!(-700));
    }

    #[test]
    fn unchanged_update_plans_nothing() {
        let entry = LedgerEntry::new("a", dec!(42));
        assert!(plan_update(&entry, &entry).is_empty());
    }

    #[test]
    fn update_across_accounts_moves_the_amount() {
        let plan = plan_update(&LedgerEntry::new("a", dec!(-30)), &LedgerEntry::new("b", dec!(-45)));
        assert_eq!(
            plan,
            vec![
                BalanceAdjustment {
                    account_id: "a".to_string(),
                    delta: dec!(30)
                },
                BalanceAdjustment {
                    account_id: "b".to_string(),
                    delta: dec!(-45)
                },
            ]
        );
    }

    #[test]
    fn delete_reverses_signed_amount() {
        let plan = plan_delete(&LedgerEntry::new("a", dec!(-12)));
        assert_eq!(plan[0].delta, dec!(12));
    }

    #[test]
    fn bulk_create_groups_by_account() {
        let plan = plan_bulk_create(&[
            LedgerEntry::new("b", dec!(-10)),
            LedgerEntry::new("a", dec!(100)),
            LedgerEntry::new("b", dec!(-5.25)),
            LedgerEntry::new("c", dec!(7)),
            LedgerEntry::new("c", dec!(-7)),
        ]);
        assert_eq!(
            plan,
            vec![
                BalanceAdjustment {
                    account_id: "a".to_string(),
                    delta: dec!(100)
                },
                BalanceAdjustment {
                    account_id: "b".to_string(),
                    delta: dec!(-15.25)
                },
            ]
        );
    }
}
