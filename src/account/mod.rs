//! User account storage

pub mod models;
pub mod repository;

pub use models::{NewUser, User, UserCredentials};
pub use repository::{PgUserStore, UserStore};
