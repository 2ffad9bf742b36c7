//! Data models for user accounts

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Registered shop user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// User row including the stored argon2 PHC string
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Insert payload for a new user (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
