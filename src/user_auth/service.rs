use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::error::AuthError;
use crate::account::{NewUser, UserStore};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user_id as string)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    #[schema(example = "florist")]
    pub username: String,
    #[validate(email)]
    #[schema(example = "florist@example.com")]
    pub email: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
}

/// User Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "florist@example.com")]
    pub email: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

/// Public profile of the logged-in user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

pub struct UserAuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl UserAuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Register a new user
    pub async fn register(&self, req: RegisterRequest) -> Result<i64, AuthError> {
        req.validate()?;

        // 1. Hash password
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .to_string();

        // 2. Insert into DB
        let user_id = self
            .users
            .create_user(NewUser {
                username: req.username,
                email: req.email,
                password_hash,
            })
            .await?
            .ok_or(AuthError::UserExists)?;

        tracing::info!(user_id, "User registered");
        Ok(user_id)
    }

    /// Login user and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        // 1. Find user by email
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. Verify password
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        // 3. Generate JWT
        let token = self.issue_token(user.user_id)?;

        Ok(AuthResponse {
            token,
            user_id: user.user_id,
            username: user.username,
            email: user.email,
        })
    }

    pub fn issue_token(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?)
    }

    /// Verify JWT token and return the user id it was issued for
    pub fn verify_token(&self, token: &str) -> Result<i64, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|_| AuthError::InvalidToken)?;
        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken)
    }

    pub async fn profile(&self, user_id: i64) -> Result<UserProfile, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound(user_id))?;
        Ok(UserProfile {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    fn service(ttl_hours: i64) -> UserAuthService {
        UserAuthService::new(
            Arc::new(MemoryStore::new()),
            "test_secret".to_string(),
            ttl_hours,
        )
    }

    fn register_req(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_login_roundtrip() {
        let auth = service(24);
        let user_id = auth
            .register(register_req("florist", "florist@example.com"))
            .await
            .unwrap();

        let resp = auth
            .login(LoginRequest {
                email: "florist@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(resp.user_id, user_id);
        assert_eq!(auth.verify_token(&resp.token).unwrap(), user_id);
        assert_eq!(auth.profile(user_id).await.unwrap().username, "florist");
    }

    #[tokio::test]
    async fn test_wrong_password_is_invalid_credentials() {
        let auth = service(24);
        auth.register(register_req("florist", "florist@example.com"))
            .await
            .unwrap();
        let err = auth
            .login(LoginRequest {
                email: "florist@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let err = service(24)
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_validation_and_duplicates() {
        let auth = service(24);
        let err = auth
            .register(register_req("florist", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        auth.register(register_req("florist", "florist@example.com"))
            .await
            .unwrap();
        let err = auth
            .register(register_req("florist", "second@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserExists));
    }

    #[test]
    fn test_expired_and_foreign_tokens_are_rejected() {
        let expired = service(-2).issue_token(1).unwrap();
        assert!(matches!(
            service(24).verify_token(&expired),
            Err(AuthError::InvalidToken)
        ));

        let foreign = UserAuthService::new(Arc::new(MemoryStore::new()), "other".to_string(), 24)
            .issue_token(1)
            .unwrap();
        assert!(matches!(
            service(24).verify_token(&foreign),
            Err(AuthError::InvalidToken)
        ));
    }
}
