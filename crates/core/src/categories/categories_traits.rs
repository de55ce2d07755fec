use async_trait::async_trait;

use super::categories_model::{Category, CategoryUpdate, CategoryWithChildren, NewCategory};
use crate::errors::Result;

#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    async fn create(&self, new_category: NewCategory) -> Result<Category>;

    /// Updates a category. A type change is refused with `ConstraintViolation`
    /// when transactions, children or budgets depend on the current type.
    async fn update(&self, update: CategoryUpdate) -> Result<Category>;

    /// Deletes a category with no children and no transactions. Budgets that
    /// pointed at it lose their category.
    async fn delete(&self, category_id: &str) -> Result<usize>;

    fn get_by_id(&self, category_id: &str) -> Result<Category>;

    /// The user's categories ordered by name.
    fn list(&self, user_id: &str) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category>;

    async fn update_category(&self, user_id: &str, update: CategoryUpdate) -> Result<Category>;

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()>;

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;

    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>>;

    fn get_categories_hierarchical(&self, user_id: &str) -> Result<Vec<CategoryWithChildren>>;
}
