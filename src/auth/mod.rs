/*!
 * # Authentication and Authorization Module
 *
 * Staff accounts live in the `users` table with argon2 password hashes.
 * A successful login issues an HS256 JWT whose claims carry the
 * `is_superuser` flag; queue mutations and cancellations are gated on it.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::ServiceError;

pub mod user;

const JWT_ISSUER: &str = "backoffice-api";

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub username: String,   // Login name
    pub is_staff: bool,     // Staff flag
    pub is_superuser: bool, // May mutate the order queue
    pub jti: String,        // JWT ID (unique identifier for this token)
    pub iat: i64,           // Issued at time
    pub exp: i64,           // Expiration time
    pub nbf: i64,           // Not valid before time
    pub iss: String,        // Issuer
}

/// Authenticated user data extracted from the JWT token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub token_id: String,
}

impl AuthUser {
    /// Fails with 403 and `message` unless the bearer is a superuser.
    pub fn require_superuser(&self, message: &str) -> Result<(), ServiceError> {
        if self.is_superuser {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(message.to_string()))
        }
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AuthError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthUser {
            user_id,
            username: claims.username,
            is_staff: claims.is_staff,
            is_superuser: claims.is_superuser,
            token_id: claims.jti,
        })
    }
}

impl AuthUser {
    /// Identity of an account that re-authenticated inline rather than by token.
    pub fn from_account(account: &user::Model) -> Self {
        AuthUser {
            user_id: account.id,
            username: account.username.clone(),
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            token_id: String::new(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: String, access_token_expiration: Duration) -> Self {
        Self {
            jwt_secret,
            jwt_issuer: JWT_ISSUER.to_string(),
            access_token_expiration,
        }
    }
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self::new(cfg.jwt_secret.clone(), Duration::from_secs(cfg.jwt_expiration as u64))
    }
}

/// Access token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub is_superuser: bool,
}

/// Fields needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Authentication service that handles credentials and token issuance
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Generate a JWT access token for a user
    pub fn generate_token(&self, account: &user::Model) -> Result<TokenResponse, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: account.id.to_string(),
            username: account.username.clone(),
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            is_superuser: account.is_superuser,
        })
    }

    /// Validate a JWT token and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    /// Check a username/password pair against an active account.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let account = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?
            .filter(|account| account.is_active)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            warn!(username, "Rejected credentials");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Authenticate, stamp `last_login` and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let account = self.authenticate(username, password).await?;

        let mut active: user::ActiveModel = account.clone().into();
        active.last_login = Set(Some(Utc::now()));
        active.update(&*self.db).await?;

        info!(user_id = account.id, "User logged in");
        self.generate_token(&account)
    }

    /// Inline re-authentication for privileged actions. Only superusers pass.
    pub async fn verify_superuser(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let account = self.authenticate(username, password).await?;
        if !account.is_superuser {
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(account)
    }

    /// Create a new account with a freshly hashed password.
    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, AuthError> {
        let password_hash = hash_password(&new_user.password)?;
        let account = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            password_hash: Set(password_hash),
            is_staff: Set(new_user.is_staff),
            is_superuser: Set(new_user.is_superuser),
            is_active: Set(true),
            last_login: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        Ok(account)
    }

    /// Create the account as a superuser, or promote and re-password it if it exists.
    pub async fn ensure_superuser(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;

        match existing {
            Some(account) => {
                let mut active: user::ActiveModel = account.into();
                active.email = Set(email.to_string());
                active.password_hash = Set(hash_password(password)?);
                active.is_staff = Set(true);
                active.is_superuser = Set(true);
                active.is_active = Set(true);
                Ok(active.update(&*self.db).await?)
            }
            None => {
                self.create_user(NewUser {
                    username: username.to_string(),
                    email: email.to_string(),
                    first_name: String::new(),
                    last_name: String::new(),
                    password: password.to_string(),
                    is_staff: true,
                    is_superuser: true,
                })
                .await
            }
        }
    }
}

/// Hash a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication credentials were not provided.")]
    MissingAuth,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuth
            | AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired => ServiceError::Unauthorized(err.to_string()),
            AuthError::InsufficientPermissions => ServiceError::Forbidden(err.to_string()),
            AuthError::TokenCreation(msg) => ServiceError::JwtError(msg),
            AuthError::DatabaseError(e) => ServiceError::DatabaseError(e),
            AuthError::InternalError(msg) => ServiceError::HashError(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

/// Extract the bearer from the `Authorization` header.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = Arc::<AuthService>::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AuthError::MissingAuth)?;

        let claims = auth_service.validate_token(token)?;
        AuthUser::try_from(claims)
    }
}
