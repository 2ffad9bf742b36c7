//! User registration, login and JWT verification

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use error::AuthError;
pub use service::{Claims, UserAuthService};

/// Identity injected into request extensions by the JWT middleware
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}
