use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use std::sync::Arc;

use super::users_model::{NewUser, PreferenceUpdate, User, UserPreference};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::Result;
use crate::utils::time_utils::today_in;

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let mut new_user = new_user;
        new_user.username = new_user.username.trim().to_string();
        let user = self
            .repository
            .create(new_user, UserPreference::defaults_for)
            .await?;
        info!("Created user {}", user.username);
        Ok(user)
    }

    async fn create_default_preferences(&self, user_id: &str) -> Result<UserPreference> {
        debug!("Creating default preferences for user {}", user_id);
        self.repository
            .insert_preferences(UserPreference::defaults_for(user_id))
            .await
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.repository.find_by_username(username.trim())
    }

    fn get_preferences(&self, user_id: &str) -> Result<UserPreference> {
        self.repository.get_preferences(user_id)
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        update: PreferenceUpdate,
    ) -> Result<UserPreference> {
        let current = self.repository.get_preferences(user_id)?;
        let next = update.apply_to(&current)?;
        self.repository.update_preferences(next).await
    }

    fn today_for(&self, user_id: &str) -> Result<NaiveDate> {
        let preferences = self.repository.get_preferences(user_id)?;
        Ok(today_in(preferences.tz()))
    }
}
