use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use tallybook_core::users::{NewUser, User, UserPreference, UserRepositoryTrait};
use tallybook_core::Result;

use super::model::{UserDB, UserPreferenceDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{not_found_as, unique_as_constraint, StorageError};
use crate::schema::{user_preferences, users};
use crate::utils::new_id;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(
        &self,
        new_user: NewUser,
        default_preferences: for<'a> fn(&'a str) -> UserPreference,
    ) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let mut user_db: UserDB = new_user.into();
                user_db.id = new_id(Some(user_db.id));

                diesel::insert_into(users::table)
                    .values(&user_db)
                    .execute(conn)
                    .map_err(StorageError::from)
                    .map_err(|e| unique_as_constraint(e.into(), "Username is already taken"))?;

                let prefs_db: UserPreferenceDB = default_preferences(&user_db.id).into();
                diesel::insert_into(user_preferences::table)
                    .values(&prefs_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(user_db.into())
            })
            .await
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        let user = not_found_as(
            users::table
                .find(user_id)
                .select(UserDB::as_select())
                .first::<UserDB>(&mut conn),
            "user",
            user_id,
        )?;
        Ok(user.into())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .filter(users::username.eq(username))
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(user.map(User::from))
    }

    async fn insert_preferences(&self, preferences: UserPreference) -> Result<UserPreference> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserPreference> {
                let prefs_db: UserPreferenceDB = preferences.into();
                diesel::insert_into(user_preferences::table)
                    .values(&prefs_db)
                    .on_conflict(user_preferences::user_id)
                    .do_update()
                    .set(&prefs_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(prefs_db.into())
            })
            .await
    }

    fn get_preferences(&self, user_id: &str) -> Result<UserPreference> {
        let mut conn = get_connection(&self.pool)?;
        let prefs = not_found_as(
            user_preferences::table
                .find(user_id)
                .select(UserPreferenceDB::as_select())
                .first::<UserPreferenceDB>(&mut conn),
            "preferences",
            user_id,
        )?;
        Ok(prefs.into())
    }

    async fn update_preferences(&self, preferences: UserPreference) -> Result<UserPreference> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<UserPreference> {
                let user_id = preferences.user_id.clone();
                let prefs_db: UserPreferenceDB = preferences.into();
                let updated = diesel::update(user_preferences::table.find(&user_id))
                    .set(&prefs_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if updated == 0 {
                    return Err(tallybook_core::Error::not_found("preferences", &user_id));
                }
                Ok(prefs_db.into())
            })
            .await
    }
}
