use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use super::categories_model::{Category, CategoryKind, CategoryUpdate, CategoryWithChildren, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, Result};
use crate::ledger::{ensure_owned, ensure_reference_owned};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Checks that `parent_id` names a category of the same owner and type.
    fn validate_parent(
        &self,
        user_id: &str,
        parent_id: Option<&str>,
        kind: CategoryKind,
    ) -> Result<Option<Category>> {
        let Some(parent_id) = parent_id else {
            return Ok(None);
        };
        let parent = match self.repository.get_by_id(parent_id) {
            Ok(parent) => parent,
            Err(e) if e.is_not_found() => {
                return Err(Error::invalid(format!("Unknown parent category: {}", parent_id)))
            }
            Err(e) => return Err(e),
        };
        if ensure_reference_owned(&parent, user_id).is_err() {
            return Err(Error::invalid("Parent category must belong to the same user."));
        }
        if parent.category_type != kind {
            return Err(Error::invalid(
                "Parent and child categories must share the same type.",
            ));
        }
        Ok(Some(parent))
    }
}

/// Builds the category forest. Children are nested recursively and keep the
/// input ordering.
fn organize_hierarchically(categories: &[Category]) -> Vec<CategoryWithChildren> {
    fn children_of(categories: &[Category], parent_id: &str, depth: usize) -> Vec<CategoryWithChildren> {
        if depth > categories.len() {
            return Vec::new();
        }
        categories
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(parent_id))
            .map(|c| CategoryWithChildren {
                category: c.clone(),
                children: children_of(categories, &c.id, depth + 1),
            })
            .collect()
    }

    categories
        .iter()
        .filter(|c| {
            c.parent_id
                .as_deref()
                .map_or(true, |p| !categories.iter().any(|other| other.id == p))
        })
        .map(|root| CategoryWithChildren {
            category: root.clone(),
            children: children_of(categories, &root.id, 0),
        })
        .collect()
}

/// True when `candidate` is `category_id` itself or lies below it.
fn is_descendant(categories: &[Category], category_id: &str, candidate: &str) -> bool {
    let mut current = Some(candidate.to_string());
    let mut hops = 0;
    while let Some(id) = current {
        if id == category_id {
            return true;
        }
        hops += 1;
        if hops > categories.len() {
            return false;
        }
        current = categories
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.parent_id.clone());
    }
    false
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    async fn create_category(&self, user_id: &str, new_category: NewCategory) -> Result<Category> {
        let mut new_category = new_category;
        new_category.user_id = user_id.to_string();
        new_category.validate()?;
        self.validate_parent(
            user_id,
            new_category.parent_id.as_deref(),
            new_category.category_type,
        )?;
        debug!("Creating category '{}' for user {}", new_category.name, user_id);
        self.repository.create(new_category).await
    }

    async fn update_category(&self, user_id: &str, update: CategoryUpdate) -> Result<Category> {
        let mut update = update;
        update.validate()?;
        ensure_owned(self.repository.get_by_id(&update.id)?, user_id)?;
        if let Some(parent) =
            self.validate_parent(user_id, update.parent_id.as_deref(), update.category_type)?
        {
            let all = self.repository.list(user_id)?;
            if is_descendant(&all, &update.id, &parent.id) {
                return Err(Error::invalid(
                    "A category cannot be moved below one of its own sub-categories.",
                ));
            }
        }
        self.repository.update(update).await
    }

    async fn delete_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        ensure_owned(self.repository.get_by_id(category_id)?, user_id)?;
        self.repository.delete(category_id).await?;
        Ok(())
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        ensure_owned(self.repository.get_by_id(category_id)?, user_id)
    }

    fn list_categories(&self, user_id: &str) -> Result<Vec<Category>> {
        self.repository.list(user_id)
    }

    fn get_categories_hierarchical(&self, user_id: &str) -> Result<Vec<CategoryWithChildren>> {
        let categories = self.repository.list(user_id)?;
        Ok(organize_hierarchically(&categories))
    }
}
