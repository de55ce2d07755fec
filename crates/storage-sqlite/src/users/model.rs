//! Database models for users and preferences.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tallybook_core::users::{NewUser, User, UserPreference};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            username: db.username,
            password_hash: db.password_hash,
            created_at: db.created_at,
        }
    }
}

impl From<NewUser> for UserDB {
    fn from(domain: NewUser) -> Self {
        Self {
            id: domain.id.unwrap_or_default(),
            username: domain.username,
            password_hash: domain.password_hash,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::user_preferences)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserPreferenceDB {
    pub user_id: String,
    pub currency: String,
    pub timezone: String,
    pub language: String,
    pub theme: String,
    pub updated_at: NaiveDateTime,
}

impl From<UserPreferenceDB> for UserPreference {
    fn from(db: UserPreferenceDB) -> Self {
        Self {
            user_id: db.user_id,
            currency: db.currency,
            timezone: db.timezone,
            language: db.language,
            theme: db.theme.parse().unwrap_or_default(),
            updated_at: db.updated_at,
        }
    }
}

impl From<UserPreference> for UserPreferenceDB {
    fn from(domain: UserPreference) -> Self {
        Self {
            user_id: domain.user_id,
            currency: domain.currency,
            timezone: domain.timezone,
            language: domain.language,
            theme: domain.theme.as_str().to_string(),
            updated_at: domain.updated_at,
        }
    }
}
