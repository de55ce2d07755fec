use async_trait::async_trait;
use chrono::NaiveDate;

use super::users_model::{NewUser, PreferenceUpdate, User, UserPreference};
use crate::errors::Result;

/// Persistence contract for users and their preferences.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    /// Inserts the user together with the preferences built by
    /// `default_preferences`, in one atomic write.
    async fn create(
        &self,
        new_user: NewUser,
        default_preferences: for<'a> fn(&'a str) -> UserPreference,
    ) -> Result<User>;

    fn get_by_id(&self, user_id: &str) -> Result<User>;

    /// Case-sensitive username lookup.
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn insert_preferences(&self, preferences: UserPreference) -> Result<UserPreference>;

    fn get_preferences(&self, user_id: &str) -> Result<UserPreference>;

    async fn update_preferences(&self, preferences: UserPreference) -> Result<UserPreference>;
}

#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Creates the user and its default preferences together.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    /// Writes default preferences for an existing user, replacing any present.
    async fn create_default_preferences(&self, user_id: &str) -> Result<UserPreference>;

    fn get_user(&self, user_id: &str) -> Result<User>;

    fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    fn get_preferences(&self, user_id: &str) -> Result<UserPreference>;

    async fn update_preferences(
        &self,
        user_id: &str,
        update: PreferenceUpdate,
    ) -> Result<UserPreference>;

    /// Current date in the user's configured timezone.
    fn today_for(&self, user_id: &str) -> Result<NaiveDate>;
}
