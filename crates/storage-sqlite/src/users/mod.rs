//! SQLite storage implementation for users and their preferences.

mod model;
mod repository;

pub use model::{UserDB, UserPreferenceDB};
pub use repository::UserRepository;
