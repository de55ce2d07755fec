#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result};
    use crate::users::{
        NewUser, PreferenceUpdate, Theme, User, UserPreference, UserRepositoryTrait, UserService,
        UserServiceTrait,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockUserRepository {
        users: Mutex<Vec<User>>,
        preferences: Mutex<Vec<UserPreference>>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl UserRepositoryTrait for MockUserRepository {
        async fn create(
            &self,
            new_user: NewUser,
            default_preferences: for<'a> fn(&'a str) -> UserPreference,
        ) -> Result<User> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let user = User {
                id: new_user.id.unwrap_or_else(|| "user-1".to_string()),
                username: new_user.username,
                password_hash: new_user.password_hash,
                created_at: Utc::now().naive_utc(),
            };
            self.preferences
                .lock()
                .unwrap()
                .push(default_preferences(&user.id));
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        fn get_by_id(&self, user_id: &str) -> Result<User> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned()
                .ok_or_else(|| Error::not_found("user", user_id))
        }

        fn find_by_username(&self, username: &str) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn insert_preferences(&self, preferences: UserPreference) -> Result<UserPreference> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.preferences.lock().unwrap().push(preferences.clone());
            Ok(preferences)
        }

        fn get_preferences(&self, user_id: &str) -> Result<UserPreference> {
            self.preferences
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.user_id == user_id)
                .cloned()
                .ok_or_else(|| Error::not_found("preferences", user_id))
        }

        async fn update_preferences(&self, preferences: UserPreference) -> Result<UserPreference> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut all = self.preferences.lock().unwrap();
            all.retain(|p| p.user_id != preferences.user_id);
            all.push(preferences.clone());
            Ok(preferences)
        }
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            id: Some("u1".to_string()),
            username: name.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn creating_a_user_creates_default_preferences() {
        let repo = Arc::new(MockUserRepository::default());
        let service = UserService::new(repo.clone());

        let user = service.create_user(new_user("  alice ")).await.unwrap();
        assert_eq!(user.username, "alice");

        let prefs = service.get_preferences(&user.id).unwrap();
        assert_eq!(prefs.currency, "USD");
        assert_eq!(prefs.timezone, "UTC");
        assert_eq!(prefs.language, "en");
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(repo.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_preferences_can_be_rewritten() {
        let repo = Arc::new(MockUserRepository::default());
        let service = UserService::new(repo.clone());
        let user = service.create_user(new_user("carol")).await.unwrap();
        repo.preferences.lock().unwrap().clear();

        let prefs = service.create_default_preferences(&user.id).await.unwrap();
        assert_eq!(prefs.user_id, user.id);
        assert_eq!(service.get_preferences(&user.id).unwrap().currency, "USD");
    }

    #[tokio::test]
    async fn blank_username_is_rejected_before_any_write() {
        let repo = Arc::new(MockUserRepository::default());
        let service = UserService::new(repo.clone());

        let err = service.create_user(new_user("   ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(repo.users.lock().unwrap().is_empty());
        assert!(repo.preferences.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn preference_update_normalizes_and_validates() {
        let repo = Arc::new(MockUserRepository::default());
        let service = UserService::new(repo.clone());
        let user = service.create_user(new_user("bob")).await.unwrap();

        let updated = service
            .update_preferences(
                &user.id,
                PreferenceUpdate {
                    currency: Some("eur".to_string()),
                    timezone: Some("Europe/Paris".to_string()),
                    theme: Some(Theme::Dark),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.currency, "EUR");
        assert_eq!(updated.timezone, "Europe/Paris");
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(updated.language, "en");

        let bad_currency = service
            .update_preferences(
                &user.id,
                PreferenceUpdate {
                    currency: Some("EURO".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad_currency, Err(Error::Validation(_))));

        let bad_zone = service
            .update_preferences(
                &user.id,
                PreferenceUpdate {
                    timezone: Some("Mars/Olympus".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad_zone, Err(Error::Validation(_))));
        assert_eq!(service.get_preferences(&user.id).unwrap().currency, "EUR");
    }
}
