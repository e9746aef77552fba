//! User authentication service
//!
//! Argon2 password hashing, stateless JWT sessions, and the registration
//! bonus. The bonus is a one-shot ledger grant: if it fails the account
//! still exists, and a retry cannot double-grant.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::config::RewardConfig;
use crate::error::ExchangeError;
use crate::notifications::{NotificationEmitter, NotificationKind};
use crate::points::{PointsLedger, PointsReason};
use crate::users::UserRepository;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user_id as string)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at
}

impl Claims {
    /// The authenticated user's id
    pub fn user_id(&self) -> Result<i64, ExchangeError> {
        self.sub
            .parse()
            .map_err(|_| ExchangeError::Internal("Invalid subject in token".to_string()))
    }
}

/// User Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 3, message = "Fullname must be at least 3 characters long"))]
    #[schema(example = "Ada Lovelace")]
    pub fullname: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// User Login Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid Email"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Auth Response (JWT)
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
    pub fullname: String,
    pub email: String,
}

pub struct UserAuthService {
    db: PgPool,
    jwt_secret: String,
    rewards: RewardConfig,
}

impl UserAuthService {
    pub fn new(db: PgPool, jwt_secret: String, rewards: RewardConfig) -> Self {
        Self {
            db,
            jwt_secret,
            rewards,
        }
    }

    /// Register a new user and grant the sign-up bonus
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, ExchangeError> {
        req.validate()
            .map_err(|e| ExchangeError::validation(e.to_string()))?;

        // 1. Hash password
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| ExchangeError::Internal(format!("Hashing failed: {}", e)))?
            .to_string();

        // 2. Insert into DB (conditional on the email being free)
        let user_id = UserRepository::create(&self.db, &req.email, &req.fullname, &password_hash)
            .await?
            .ok_or(ExchangeError::EmailTaken)?;

        info!(user_id, "User registered");

        // 3. Sign-up bonus: one-shot, non-fatal
        match PointsLedger::grant_once(
            &self.db,
            user_id,
            self.rewards.registration_bonus,
            PointsReason::Registration,
        )
        .await
        {
            Ok(true) => {
                NotificationEmitter::notify(
                    &self.db,
                    user_id,
                    None,
                    NotificationKind::PointsAwarded,
                    format!(
                        "{} (+{} points)",
                        PointsReason::Registration.label(),
                        self.rewards.registration_bonus
                    ),
                    None,
                )
                .await;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(user_id, error = %e, "Sign-up bonus failed (account kept)");
            }
        }

        let token = self.issue_token(user_id)?;
        Ok(AuthResponse {
            token,
            user_id,
            fullname: req.fullname,
            email: req.email,
        })
    }

    /// Login user and issue JWT
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ExchangeError> {
        req.validate()
            .map_err(|e| ExchangeError::validation(e.to_string()))?;

        // 1. Find user by email
        let user = UserRepository::get_by_email(&self.db, &req.email)
            .await?
            .ok_or_else(|| ExchangeError::unauthorized("Invalid email or password"))?;

        // 2. Verify password
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| ExchangeError::Internal(format!("Invalid hash format: {}", e)))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| ExchangeError::unauthorized("Invalid email or password"))?;

        // 3. Generate JWT
        let token = self.issue_token(user.user_id)?;

        Ok(AuthResponse {
            token,
            user_id: user.user_id,
            fullname: user.fullname,
            email: user.email,
        })
    }

    /// Verify JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, ExchangeError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| ExchangeError::unauthorized("Invalid or expired token"))?;
        Ok(token_data.claims)
    }

    fn issue_token(&self, user_id: i64) -> Result<String, ExchangeError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(Duration::hours(24))
            .ok_or_else(|| ExchangeError::Internal("Clock overflow".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ExchangeError::Internal(format!("Failed to generate token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_user_id() {
        let claims = Claims {
            sub: "42".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.user_id().unwrap(), 42);

        let bad = Claims {
            sub: "not-a-number".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(bad.user_id().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            fullname: "Ada Lovelace".to_string(),
            password: "password123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            email: "ada@example.com".to_string(),
            fullname: "Ada Lovelace".to_string(),
            password: "abc".to_string(),
        };
        assert!(short_password.validate().is_err());

        let ok = RegisterRequest {
            email: "ada@example.com".to_string(),
            fullname: "Ada Lovelace".to_string(),
            password: "password123".to_string(),
        };
        assert!(ok.validate().is_ok());
    }
}
