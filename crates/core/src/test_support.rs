//! In-memory ledger shared by the service tests.
//!
//! Implements every repository trait over one mutex-guarded state so that
//! balance adjustments, delete guards and joins behave like the SQLite store.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Mutex;

use crate::accounts::{Account, AccountRepositoryTrait, AccountUpdate, NewAccount};
use crate::budgets::{Budget, BudgetRepositoryTrait, BudgetUpdate, NewBudget};
use crate::categories::{
    ensure_type_change_allowed, Category, CategoryKind, CategoryRepositoryTrait, CategoryUpdate,
    NewCategory,
};
use crate::errors::{Error, Result};
use crate::ledger::{ensure_deletable, DependentCounts, EntityKind};
use crate::transactions::{
    plan_bulk_create, plan_create, plan_delete, plan_update, signed_amount, BalanceAdjustment,
    LedgerEntry, NewTransaction, Transaction, TransactionDetails, TransactionFilter,
    TransactionRepositoryTrait, TransactionUpdate,
};
use crate::users::{NewUser, User, UserPreference, UserRepositoryTrait};

#[derive(Default)]
struct LedgerState {
    next_id: u64,
    users: Vec<User>,
    preferences: Vec<UserPreference>,
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

impl LedgerState {
    fn id(&mut self, prefix: &str, requested: Option<String>) -> String {
        requested.unwrap_or_else(|| {
            self.next_id += 1;
            format!("{}-{}", prefix, self.next_id)
        })
    }

    fn kind_of(&self, category_id: Option<&str>) -> Option<CategoryKind> {
        category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.category_type)
        })
    }

    fn entry(&self, account_id: &str, amount: Decimal, category_id: Option<&str>) -> LedgerEntry {
        LedgerEntry::new(account_id, signed_amount(amount, self.kind_of(category_id)))
    }

    fn apply(&mut self, adjustments: Vec<BalanceAdjustment>) -> Result<()> {
        for adjustment in adjustments {
            let account = self
                .accounts
                .iter_mut()
                .find(|a| a.id == adjustment.account_id)
                .ok_or_else(|| Error::not_found("account", &adjustment.account_id))?;
            account.current_balance += adjustment.delta;
        }
        Ok(())
    }

    fn category_counts(&self, category_id: &str) -> DependentCounts {
        DependentCounts {
            transactions: self
                .transactions
                .iter()
                .filter(|t| t.category_id.as_deref() == Some(category_id))
                .count() as i64,
            child_categories: self
                .categories
                .iter()
                .filter(|c| c.parent_id.as_deref() == Some(category_id))
                .count() as i64,
            budgets: self
                .budgets
                .iter()
                .filter(|b| b.category_id.as_deref() == Some(category_id))
                .count() as i64,
        }
    }

    fn details(&self, transaction: &Transaction) -> TransactionDetails {
        let category = transaction
            .category_id
            .as_deref()
            .and_then(|id| self.categories.iter().find(|c| c.id == id));
        TransactionDetails {
            account_name: self
                .accounts
                .iter()
                .find(|a| a.id == transaction.account_id)
                .map(|a| a.name.clone())
                .unwrap_or_default(),
            category_name: category.map(|c| c.name.clone()),
            category_type: category.map(|c| c.category_type),
            transaction: transaction.clone(),
        }
    }

    fn build_transaction(&mut self, new: NewTransaction) -> Transaction {
        let now = Utc::now().naive_utc();
        Transaction {
            id: self.id("txn", new.id),
            user_id: new.user_id,
            account_id: new.account_id,
            category_id: new.category_id,
            date: new.date,
            amount: new.amount,
            currency: new.currency,
            description: new.description,
            notes: new.notes,
            tags: new.tags,
            attachment: new.attachment,
            is_recurring: new.is_recurring,
            recurrence_interval: new.recurrence_interval,
            recurrence_end_date: new.recurrence_end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes `initial + sum(signed)` for an account from scratch.
    pub fn recomputed_balance(&self, account_id: &str) -> Decimal {
        let state = self.state.lock().unwrap();
        let initial = state
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .map(|a| a.initial_balance)
            .unwrap_or_default();
        state
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .fold(initial, |acc, t| {
                acc + signed_amount(t.amount, state.kind_of(t.category_id.as_deref()))
            })
    }

    pub fn stored_balance(&self, account_id: &str) -> Decimal {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .map(|a| a.current_balance)
            .unwrap_or_default()
    }

    pub fn transaction_count(&self) -> usize {
        self.state.lock().unwrap().transactions.len()
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryLedger {
    async fn create(
        &self,
        new_user: NewUser,
        default_preferences: for<'a> fn(&'a str) -> UserPreference,
    ) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.username == new_user.username) {
            return Err(Error::ConstraintViolation(
                "Username is already taken".to_string(),
            ));
        }
        let user = User {
            id: state.id("user", new_user.id),
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: Utc::now().naive_utc(),
        };
        state.preferences.push(default_preferences(&user.id));
        state.users.push(user.clone());
        Ok(user)
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("user", user_id))
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_preferences(&self, preferences: UserPreference) -> Result<UserPreference> {
        let mut state = self.state.lock().unwrap();
        state.preferences.retain(|p| p.user_id != preferences.user_id);
        state.preferences.push(preferences.clone());
        Ok(preferences)
    }

    fn get_preferences(&self, user_id: &str) -> Result<UserPreference> {
        self.state
            .lock()
            .unwrap()
            .preferences
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("preferences", user_id))
    }

    async fn update_preferences(&self, preferences: UserPreference) -> Result<UserPreference> {
        UserRepositoryTrait::insert_preferences(self, preferences).await
    }
}

#[async_trait]
impl AccountRepositoryTrait for InMemoryLedger {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        let mut state = self.state.lock().unwrap();
        let account = Account {
            id: state.id("acc", new_account.id),
            user_id: new_account.user_id,
            name: new_account.name,
            account_type: new_account.account_type,
            currency: new_account.currency,
            initial_balance: new_account.initial_balance,
            current_balance: new_account.initial_balance,
            description: new_account.description,
            created_at: Utc::now().naive_utc(),
        };
        state.accounts.push(account.clone());
        Ok(account)
    }

    async fn update(&self, update: AccountUpdate) -> Result<Account> {
        let mut state = self.state.lock().unwrap();
        let id = update.id.unwrap_or_default();
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found("account", &id))?;
        account.current_balance += update.initial_balance - account.initial_balance;
        account.initial_balance = update.initial_balance;
        account.name = update.name;
        account.account_type = update.account_type;
        account.currency = update.currency;
        account.description = update.description;
        Ok(account.clone())
    }

    async fn delete(&self, account_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let counts = DependentCounts {
            transactions: state
                .transactions
                .iter()
                .filter(|t| t.account_id == account_id)
                .count() as i64,
            ..Default::default()
        };
        ensure_deletable(EntityKind::Account, &counts)?;
        let before = state.accounts.len();
        state.accounts.retain(|a| a.id != account_id);
        Ok(before - state.accounts.len())
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| Error::not_found("account", account_id))
    }

    fn list(&self, user_id: &str) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .state
            .lock()
            .unwrap()
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }
}

#[async_trait]
impl CategoryRepositoryTrait for InMemoryLedger {
    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        let mut state = self.state.lock().unwrap();
        let duplicate = state.categories.iter().any(|c| {
            c.user_id == new_category.user_id
                && c.name == new_category.name
                && c.parent_id == new_category.parent_id
        });
        if duplicate {
            return Err(Error::ConstraintViolation(
                "A category with this name already exists here.".to_string(),
            ));
        }
        let category = Category {
            id: state.id("cat", new_category.id),
            user_id: new_category.user_id,
            name: new_category.name,
            category_type: new_category.category_type,
            parent_id: new_category.parent_id,
            created_at: Utc::now().naive_utc(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, update: CategoryUpdate) -> Result<Category> {
        let mut state = self.state.lock().unwrap();
        let counts = state.category_counts(&update.id);
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == update.id)
            .ok_or_else(|| Error::not_found("category", &update.id))?;
        if category.category_type != update.category_type {
            ensure_type_change_allowed(&counts)?;
        }
        category.name = update.name;
        category.category_type = update.category_type;
        category.parent_id = update.parent_id;
        Ok(category.clone())
    }

    async fn delete(&self, category_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        ensure_deletable(EntityKind::Category, &state.category_counts(category_id))?;
        for budget in state
            .budgets
            .iter_mut()
            .filter(|b| b.category_id.as_deref() == Some(category_id))
        {
            budget.category_id = None;
        }
        let before = state.categories.len();
        state.categories.retain(|c| c.id != category_id);
        Ok(before - state.categories.len())
    }

    fn get_by_id(&self, category_id: &str) -> Result<Category> {
        self.state
            .lock()
            .unwrap()
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .ok_or_else(|| Error::not_found("category", category_id))
    }

    fn list(&self, user_id: &str) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .state
            .lock()
            .unwrap()
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryLedger {
    async fn create(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let mut state = self.state.lock().unwrap();
        let entry = state.entry(
            &new_transaction.account_id,
            new_transaction.amount,
            new_transaction.category_id.as_deref(),
        );
        state.apply(plan_create(&entry))?;
        let transaction = state.build_transaction(new_transaction);
        state.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn create_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let entries: Vec<LedgerEntry> = new_transactions
            .iter()
            .map(|t| state.entry(&t.account_id, t.amount, t.category_id.as_deref()))
            .collect();
        state.apply(plan_bulk_create(&entries))?;
        let count = new_transactions.len();
        for new_transaction in new_transactions {
            let transaction = state.build_transaction(new_transaction);
            state.transactions.push(transaction);
        }
        Ok(count)
    }

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction> {
        let mut state = self.state.lock().unwrap();
        let old = state
            .transactions
            .iter()
            .find(|t| t.id == update.id)
            .cloned()
            .ok_or_else(|| Error::not_found("transaction", &update.id))?;
        let old_entry = state.entry(&old.account_id, old.amount, old.category_id.as_deref());
        let new_entry = state.entry(
            &update.account_id,
            update.amount,
            update.category_id.as_deref(),
        );
        state.apply(plan_update(&old_entry, &new_entry))?;

        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| t.id == update.id)
            .ok_or_else(|| Error::not_found("transaction", &update.id))?;
        transaction.account_id = update.account_id;
        transaction.category_id = update.category_id;
        transaction.date = update.date;
        transaction.amount = update.amount;
        transaction.currency = update.currency;
        transaction.description = update.description;
        transaction.notes = update.notes;
        transaction.tags = update.tags;
        transaction.attachment = update.attachment;
        transaction.is_recurring = update.is_recurring;
        transaction.recurrence_interval = update.recurrence_interval;
        transaction.recurrence_end_date = update.recurrence_end_date;
        transaction.updated_at = Utc::now().naive_utc();
        Ok(transaction.clone())
    }

    async fn delete(&self, transaction_id: &str) -> Result<Transaction> {
        let mut state = self.state.lock().unwrap();
        let old = state
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| Error::not_found("transaction", transaction_id))?;
        let entry = state.entry(&old.account_id, old.amount, old.category_id.as_deref());
        state.apply(plan_delete(&entry))?;
        state.transactions.retain(|t| t.id != transaction_id);
        Ok(old)
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| Error::not_found("transaction", transaction_id))
    }

    fn list(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<TransactionDetails>> {
        let state = self.state.lock().unwrap();
        let search = filter.search_term().map(str::to_lowercase);
        let mut rows: Vec<TransactionDetails> = state
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| filter.account_id.as_ref().map_or(true, |a| &t.account_id == a))
            .filter(|t| {
                filter
                    .category_id
                    .as_ref()
                    .map_or(true, |c| t.category_id.as_ref() == Some(c))
            })
            .filter(|t| filter.start_date.map_or(true, |d| t.date >= d))
            .filter(|t| filter.end_date.map_or(true, |d| t.date <= d))
            .filter(|t| filter.matches_tags(&t.tags))
            .filter(|t| {
                search.as_ref().map_or(true, |s| {
                    t.description.to_lowercase().contains(s) || t.notes.to_lowercase().contains(s)
                })
            })
            .map(|t| state.details(t))
            .collect();
        rows.sort_by(|a, b| {
            b.transaction
                .date
                .cmp(&a.transaction.date)
                .then(b.transaction.created_at.cmp(&a.transaction.created_at))
        });
        Ok(rows)
    }

    fn count_for_user(&self, user_id: &str) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .count() as i64)
    }

    fn sum_expenses(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        category_id: Option<&str>,
    ) -> Result<Decimal> {
        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.date >= start && t.date <= end)
            .filter(|t| category_id.map_or(true, |c| t.category_id.as_deref() == Some(c)))
            .filter(|t| {
                state
                    .kind_of(t.category_id.as_deref())
                    .is_some_and(|k| k.is_expense())
            })
            .map(|t| t.amount)
            .sum())
    }
}

#[async_trait]
impl BudgetRepositoryTrait for InMemoryLedger {
    async fn create(&self, new_budget: NewBudget) -> Result<Budget> {
        let mut state = self.state.lock().unwrap();
        let budget = Budget {
            id: state.id("bud", new_budget.id),
            user_id: new_budget.user_id,
            name: new_budget.name,
            category_id: new_budget.category_id,
            amount: new_budget.amount,
            period: new_budget.period,
            start_date: new_budget
                .start_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            end_date: new_budget.end_date,
            created_at: Utc::now().naive_utc(),
        };
        state.budgets.push(budget.clone());
        Ok(budget)
    }

    async fn update(&self, update: BudgetUpdate) -> Result<Budget> {
        let mut state = self.state.lock().unwrap();
        let budget = state
            .budgets
            .iter_mut()
            .find(|b| b.id == update.id)
            .ok_or_else(|| Error::not_found("budget", &update.id))?;
        budget.name = update.name;
        budget.category_id = update.category_id;
        budget.amount = update.amount;
        budget.period = update.period;
        budget.start_date = update.start_date;
        budget.end_date = update.end_date;
        Ok(budget.clone())
    }

    async fn delete(&self, budget_id: &str) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let before = state.budgets.len();
        state.budgets.retain(|b| b.id != budget_id);
        Ok(before - state.budgets.len())
    }

    fn get_by_id(&self, budget_id: &str) -> Result<Budget> {
        self.state
            .lock()
            .unwrap()
            .budgets
            .iter()
            .find(|b| b.id == budget_id)
            .cloned()
            .ok_or_else(|| Error::not_found("budget", budget_id))
    }

    fn list(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut budgets: Vec<Budget> = self
            .state
            .lock()
            .unwrap()
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(budgets)
    }
}
