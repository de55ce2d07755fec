//! Database model for categories.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tallybook_core::categories::{Category, NewCategory};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct CategoryDB {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_type: String,
    pub parent_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            name: db.name,
            category_type: db.category_type.parse().unwrap_or_default(),
            parent_id: db.parent_id,
            created_at: db.created_at,
        }
    }
}

impl From<NewCategory> for CategoryDB {
    fn from(domain: NewCategory) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            user_id: domain.user_id,
            name: domain.name,
            category_type: domain.category_type.as_str().to_string(),
            parent_id: domain.parent_id,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
