#[cfg(test)]
mod tests {
    use crate::budgets::{BudgetPeriod, BudgetService, BudgetServiceTrait, NewBudget};
    use crate::categories::{
        Category, CategoryKind, CategoryService, CategoryServiceTrait, CategoryUpdate, NewCategory,
    };
    use crate::test_support::InMemoryLedger;
    use crate::Error;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn service() -> (Arc<InMemoryLedger>, CategoryService) {
        let store = Arc::new(InMemoryLedger::new());
        (store.clone(), CategoryService::new(store))
    }

    fn new_category(name: &str, kind: CategoryKind, parent: Option<&Category>) -> NewCategory {
        NewCategory {
            id: None,
            user_id: String::new(),
            name: name.to_string(),
            category_type: kind,
            parent_id: parent.map(|p| p.id.clone()),
        }
    }

    fn update_of(category: &Category) -> CategoryUpdate {
        CategoryUpdate {
            id: category.id.clone(),
            name: category.name.clone(),
            category_type: category.category_type,
            parent_id: category.parent_id.clone(),
        }
    }

    #[tokio::test]
    async fn hierarchy_nests_children_under_roots() {
        let (_, service) = service();
        let food = service
            .create_category("u1", new_category("Food", CategoryKind::Expense, None))
            .await
            .unwrap();
        let groceries = service
            .create_category("u1", new_category("Groceries", CategoryKind::Expense, Some(&food)))
            .await
            .unwrap();
        service
            .create_category(
                "u1",
                new_category("Produce", CategoryKind::Expense, Some(&groceries)),
            )
            .await
            .unwrap();
        service
            .create_category("u1", new_category("Salary", CategoryKind::Income, None))
            .await
            .unwrap();

        let tree = service.get_categories_hierarchical("u1").unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].category.name, "Food");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].category.name, "Groceries");
        assert_eq!(tree[0].children[0].children[0].category.name, "Produce");
        assert!(tree[1].children.is_empty());
    }

    #[tokio::test]
    async fn parent_must_share_type_and_owner() {
        let (_, service) = service();
        let salary = service
            .create_category("u1", new_category("Salary", CategoryKind::Income, None))
            .await
            .unwrap();
        let err = service
            .create_category("u1", new_category("Bonus", CategoryKind::Expense, Some(&salary)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("share the same type"));

        let err = service
            .create_category("u2", new_category("Bonus", CategoryKind::Income, Some(&salary)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("same user"));
    }

    #[tokio::test]
    async fn duplicate_name_under_same_parent_is_rejected() {
        let (_, service) = service();
        service
            .create_category("u1", new_category("Food", CategoryKind::Expense, None))
            .await
            .unwrap();
        let err = service
            .create_category("u1", new_category("Food", CategoryKind::Expense, None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        assert!(service
            .create_category("u2", new_category("Food", CategoryKind::Expense, None))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn moving_a_category_below_its_descendant_is_rejected() {
        let (_, service) = service();
        let food = service
            .create_category("u1", new_category("Food", CategoryKind::Expense, None))
            .await
            .unwrap();
        let groceries = service
            .create_category("u1", new_category("Groceries", CategoryKind::Expense, Some(&food)))
            .await
            .unwrap();

        let mut update = update_of(&food);
        update.parent_id = Some(groceries.id.clone());
        let err = service.update_category("u1", update).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let mut update = update_of(&food);
        update.parent_id = Some(food.id.clone());
        assert!(service.update_category("u1", update).await.is_err());
    }

    #[tokio::test]
    async fn category_with_children_cannot_be_deleted() {
        let (_, service) = service();
        let food = service
            .create_category("u1", new_category("Food", CategoryKind::Expense, None))
            .await
            .unwrap();
        let groceries = service
            .create_category("u1", new_category("Groceries", CategoryKind::Expense, Some(&food)))
            .await
            .unwrap();

        let err = service.delete_category("u1", &food.id).await.unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        service.delete_category("u1", &groceries.id).await.unwrap();
        service.delete_category("u1", &food.id).await.unwrap();
        assert!(service.list_categories("u1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn type_change_is_refused_while_a_budget_depends_on_it() {
        let (store, service) = service();
        let budgets = BudgetService::new(store.clone(), store.clone(), store.clone());
        let food = service
            .create_category("u1", new_category("Food", CategoryKind::Expense, None))
            .await
            .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let budget = budgets
            .create_budget(
                "u1",
                NewBudget {
                    id: None,
                    user_id: String::new(),
                    name: "Food".to_string(),
                    category_id: Some(food.id.clone()),
                    amount: dec!(200),
                    period: BudgetPeriod::Monthly,
                    start_date: None,
                    end_date: None,
                },
                today,
            )
            .await
            .unwrap();

        let mut update = update_of(&food);
        update.category_type = CategoryKind::Income;
        let err = service.update_category("u1", update).await.unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        service.delete_category("u1", &food.id).await.unwrap();
        let orphaned = budgets.get_budget("u1", &budget.id).unwrap();
        assert_eq!(orphaned.category_id, None);
    }

    #[tokio::test]
    async fn unused_category_may_change_type() {
        let (_, service) = service();
        let misc = service
            .create_category("u1", new_category("Misc", CategoryKind::Expense, None))
            .await
            .unwrap();
        let mut update = update_of(&misc);
        update.category_type = CategoryKind::Income;
        let updated = service.update_category("u1", update).await.unwrap();
        assert_eq!(updated.category_type, CategoryKind::Income);
    }
}
