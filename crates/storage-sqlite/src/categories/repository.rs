use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use tallybook_core::categories::{
    ensure_type_change_allowed, Category, CategoryRepositoryTrait, CategoryUpdate, NewCategory,
};
use tallybook_core::ledger::{ensure_deletable, DependentCounts, EntityKind};
use tallybook_core::Result;

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, unique_as_constraint, StorageError};
use crate::schema::{budgets, categories, transactions};
use crate::utils::new_id;

const DUPLICATE_NAME: &str = "A category with this name already exists here.";

fn dependent_counts(conn: &mut SqliteConnection, category_id: &str) -> Result<DependentCounts> {
    let transactions = transactions::table
        .filter(transactions::category_id.eq(category_id))
        .count()
        .get_result::<i64>(conn)
        .map_err(StorageError::from)?;
    let child_categories = categories::table
        .filter(categories::parent_id.eq(category_id))
        .count()
        .get_result::<i64>(conn)
        .map_err(StorageError::from)?;
    let budgets = budgets::table
        .filter(budgets::category_id.eq(category_id))
        .count()
        .get_result::<i64>(conn)
        .map_err(StorageError::from)?;
    Ok(DependentCounts {
        transactions,
        child_categories,
        budgets,
    })
}

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let mut category_db: CategoryDB = new_category.into();
                category_db.id = new_id(Some(category_db.id));

                diesel::insert_into(categories::table)
                    .values(&category_db)
                    .execute(conn)
                    .map_err(StorageError::from)
                    .map_err(|e| unique_as_constraint(e.into(), DUPLICATE_NAME))?;
                Ok(category_db.into())
            })
            .await
    }

    async fn update(&self, update: CategoryUpdate) -> Result<Category> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Category> {
                let existing = not_found_as(
                    categories::table
                        .find(&update.id)
                        .select(CategoryDB::as_select())
                        .first::<CategoryDB>(conn),
                    "category",
                    &update.id,
                )?;

                let new_type = update.category_type.as_str().to_string();
                if existing.category_type != new_type {
                    ensure_type_change_allowed(&dependent_counts(conn, &update.id)?)?;
                }

                let updated = CategoryDB {
                    name: update.name,
                    category_type: new_type,
                    parent_id: update.parent_id,
                    ..existing
                };
                diesel::update(categories::table.find(&updated.id))
                    .set(&updated)
                    .execute(conn)
                    .map_err(StorageError::from)
                    .map_err(|e| unique_as_constraint(e.into(), DUPLICATE_NAME))?;
                Ok(updated.into())
            })
            .await
    }

    async fn delete(&self, category_id: &str) -> Result<usize> {
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                ensure_deletable(EntityKind::Category, &dependent_counts(conn, &category_id)?)?;

                // Budgets on the category fall back to tracking all expenses.
                diesel::update(budgets::table.filter(budgets::category_id.eq(&category_id)))
                    .set(budgets::category_id.eq(None::<String>))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let affected = diesel::delete(categories::table.find(&category_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    fn get_by_id(&self, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        let category = not_found_as(
            categories::table
                .find(category_id)
                .select(CategoryDB::as_select())
                .first::<CategoryDB>(&mut conn),
            "category",
            category_id,
        )?;
        Ok(category.into())
    }

    fn list(&self, user_id: &str) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let results = categories::table
            .filter(categories::user_id.eq(user_id))
            .select(CategoryDB::as_select())
            .order(categories::name.asc())
            .load::<CategoryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(results.into_iter().map(Category::from).collect())
    }
}
