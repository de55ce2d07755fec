//! Users module - user records and their display/locale preferences.

mod users_model;
mod users_service;
mod users_traits;

#[cfg(test)]
mod users_service_tests;

pub use users_model::{NewUser, PreferenceUpdate, Theme, User, UserPreference};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
