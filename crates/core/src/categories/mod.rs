//! Categories module - income/expense classification tree.

mod categories_model;
mod categories_service;
mod categories_traits;

#[cfg(test)]
mod categories_service_tests;

pub use categories_model::{
    ensure_type_change_allowed, Category, CategoryKind, CategoryUpdate, CategoryWithChildren,
    NewCategory,
};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
