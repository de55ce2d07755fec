#[cfg(test)]
mod tests {
    use crate::accounts::{Account, AccountService, AccountServiceTrait, AccountType, NewAccount};
    use crate::budgets::{
        BudgetPeriod, BudgetProgress, BudgetService, BudgetServiceTrait, BudgetUpdate, NewBudget,
    };
    use crate::categories::{
        Category, CategoryKind, CategoryService, CategoryServiceTrait, NewCategory,
    };
    use crate::test_support::InMemoryLedger;
    use crate::transactions::{
        NewTransaction, RecurrenceInterval, TransactionService, TransactionServiceTrait,
    };
    use crate::Error;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct Fixture {
        budgets: BudgetService,
        transactions: TransactionService,
        account: Account,
        groceries: Category,
        dining: Category,
        salary: Category,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryLedger::new());
        let accounts = AccountService::new(store.clone());
        let categories = CategoryService::new(store.clone());
        let category = |name: &str, kind| NewCategory {
            id: None,
            user_id: String::new(),
            name: name.to_string(),
            category_type: kind,
            parent_id: None,
        };
        Fixture {
            account: accounts
                .create_account(
                    "u1",
                    NewAccount {
                        id: None,
                        user_id: String::new(),
                        name: "Checking".to_string(),
                        account_type: AccountType::Asset,
                        currency: "USD".to_string(),
                        initial_balance: dec!(1000),
                        description: String::new(),
                    },
                )
                .await
                .unwrap(),
            groceries: categories
                .create_category("u1", category("Groceries", CategoryKind::Expense))
                .await
                .unwrap(),
            dining: categories
                .create_category("u1", category("Dining", CategoryKind::Expense))
                .await
                .unwrap(),
            salary: categories
                .create_category("u1", category("Salary", CategoryKind::Income))
                .await
                .unwrap(),
            budgets: BudgetService::new(store.clone(), store.clone(), store.clone()),
            transactions: TransactionService::new(store.clone(), store.clone(), store),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(name: &str, category: Option<&Category>, amount: Decimal) -> NewBudget {
        NewBudget {
            id: None,
            user_id: String::new(),
            name: name.to_string(),
            category_id: category.map(|c| c.id.clone()),
            amount,
            period: BudgetPeriod::Monthly,
            start_date: None,
            end_date: None,
        }
    }

    async fn spend(f: &Fixture, category: &Category, amount: Decimal, date: NaiveDate) {
        f.transactions
            .create_transaction(
                "u1",
                NewTransaction {
                    id: None,
                    user_id: String::new(),
                    account_id: f.account.id.clone(),
                    category_id: Some(category.id.clone()),
                    date,
                    amount,
                    currency: String::new(),
                    description: String::new(),
                    notes: String::new(),
                    tags: String::new(),
                    attachment: None,
                    is_recurring: false,
                    recurrence_interval: RecurrenceInterval::None,
                    recurrence_end_date: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn monthly_budget_counts_only_this_month() {
        let f = fixture().await;
        let today = day(2025, 3, 15);
        let budget = f
            .budgets
            .create_budget("u1", monthly("Food", Some(&f.groceries), dec!(200)), today)
            .await
            .unwrap();
        assert_eq!(budget.start_date, today);

        spend(&f, &f.groceries, dec!(40), day(2025, 3, 2)).await;
        spend(&f, &f.groceries, dec!(99), day(2025, 2, 28)).await;
        spend(&f, &f.dining, dec!(15), day(2025, 3, 3)).await;

        let progress = f.budgets.evaluate_budget("u1", &budget.id, today).unwrap();
        assert_eq!(progress.period_start, day(2025, 3, 1));
        assert_eq!(progress.period_end, day(2025, 3, 31));
        assert_eq!(progress.spent, dec!(40));
        assert_eq!(progress.remaining, dec!(160));
        assert_eq!(progress.percentage, 20.0);
        assert!(!progress.over_budget);
    }

    #[tokio::test]
    async fn budget_without_category_tracks_all_expenses() {
        let f = fixture().await;
        let today = day(2025, 3, 15);
        let budget = f
            .budgets
            .create_budget("u1", monthly("Everything", None, dec!(50)), today)
            .await
            .unwrap();
        spend(&f, &f.groceries, dec!(40), day(2025, 3, 2)).await;
        spend(&f, &f.dining, dec!(15), day(2025, 3, 3)).await;
        spend(&f, &f.salary, dec!(3000), day(2025, 3, 1)).await;

        let progress = f.budgets.evaluate_budget("u1", &budget.id, today).unwrap();
        assert_eq!(progress.spent, dec!(55));
        assert_eq!(progress.remaining, dec!(-5));
        assert!(progress.over_budget);
        assert_eq!(progress.percentage, 110.0);
    }

    #[tokio::test]
    async fn yearly_and_custom_periods_use_their_ranges() {
        let f = fixture().await;
        let today = day(2025, 7, 4);
        let yearly = f
            .budgets
            .create_budget(
                "u1",
                NewBudget {
                    period: BudgetPeriod::Yearly,
                    end_date: Some(day(2025, 8, 1)),
                    ..monthly("Year", Some(&f.groceries), dec!(1000))
                },
                today,
            )
            .await
            .unwrap();
        assert_eq!(yearly.end_date, None);

        let custom = f
            .budgets
            .create_budget(
                "u1",
                NewBudget {
                    period: BudgetPeriod::Custom,
                    start_date: Some(day(2025, 6, 10)),
                    end_date: Some(day(2025, 6, 20)),
                    ..monthly("Trip", Some(&f.groceries), dec!(100))
                },
                today,
            )
            .await
            .unwrap();

        spend(&f, &f.groceries, dec!(30), day(2025, 1, 5)).await;
        spend(&f, &f.groceries, dec!(25), day(2025, 6, 15)).await;
        spend(&f, &f.groceries, dec!(7), day(2025, 6, 21)).await;

        let yearly = f.budgets.evaluate_budget("u1", &yearly.id, today).unwrap();
        assert_eq!(yearly.spent, dec!(62));
        let custom = f.budgets.evaluate_budget("u1", &custom.id, today).unwrap();
        assert_eq!((custom.period_start, custom.period_end), (day(2025, 6, 10), day(2025, 6, 20)));
        assert_eq!(custom.spent, dec!(25));
    }

    #[tokio::test]
    async fn custom_budget_requires_an_ordered_end_date() {
        let f = fixture().await;
        let today = day(2025, 7, 4);
        let missing_end = NewBudget {
            period: BudgetPeriod::Custom,
            ..monthly("Trip", None, dec!(100))
        };
        assert!(f.budgets.create_budget("u1", missing_end, today).await.is_err());

        let reversed = NewBudget {
            period: BudgetPeriod::Custom,
            start_date: Some(day(2025, 7, 10)),
            end_date: Some(day(2025, 7, 1)),
            ..monthly("Trip", None, dec!(100))
        };
        let err = f.budgets.create_budget("u1", reversed, today).await.unwrap_err();
        assert!(err.to_string().contains("End date must be after the start date."));
    }

    #[tokio::test]
    async fn income_category_cannot_be_budgeted() {
        let f = fixture().await;
        let err = f
            .budgets
            .create_budget("u1", monthly("Pay", Some(&f.salary), dec!(10)), day(2025, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn updates_are_owner_scoped() {
        let f = fixture().await;
        let today = day(2025, 3, 15);
        let budget = f
            .budgets
            .create_budget("u1", monthly("Food", Some(&f.groceries), dec!(200)), today)
            .await
            .unwrap();
        let update = BudgetUpdate {
            id: budget.id.clone(),
            name: "Food & drink".to_string(),
            category_id: Some(f.dining.id.clone()),
            amount: dec!(250),
            period: BudgetPeriod::Monthly,
            start_date: budget.start_date,
            end_date: None,
        };

        assert!(f
            .budgets
            .update_budget("u2", update.clone())
            .await
            .unwrap_err()
            .is_not_found());
        let updated = f.budgets.update_budget("u1", update).await.unwrap();
        assert_eq!(updated.amount, dec!(250));
        assert_eq!(updated.category_id.as_deref(), Some(f.dining.id.as_str()));
    }

    #[tokio::test]
    async fn progress_list_is_sorted_and_truncated() {
        let f = fixture().await;
        let today = day(2025, 3, 15);
        for name in ["Zoo", "Art", "Music"] {
            f.budgets
                .create_budget("u1", monthly(name, None, dec!(10)), today)
                .await
                .unwrap();
        }
        let progress = f.budgets.progress_for_user("u1", today, Some(2)).unwrap();
        let names: Vec<&str> = progress.iter().map(|p| p.budget.name.as_str()).collect();
        assert_eq!(names, vec!["Art", "Music"]);
        assert_eq!(f.budgets.progress_for_user("u1", today, None).unwrap().len(), 3);
    }

    #[test]
    fn percentage_is_capped_and_safe_for_zero_targets() {
        assert_eq!(BudgetProgress::percentage_of(dec!(50), dec!(200)), 25.0);
        assert_eq!(BudgetProgress::percentage_of(dec!(10000), dec!(1)), 999.0);
        assert_eq!(BudgetProgress::percentage_of(dec!(10), dec!(0)), 0.0);
    }
}
