//! Authentication service: password hashing and bearer tokens.
//!
//! Passwords are hashed with Argon2id. Sessions are stateless JWTs signed
//! with HS256; the token carries only the user ID and expiry, so every
//! authenticated request re-fetches the user from the store.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use summit_core::UserId;

use crate::config::ApiConfig;
use crate::models::User;
use crate::store::{NewUser, Store, StoreError};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("weak password: {0}")]
    WeakPassword(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("password hashing failed")]
    Hashing,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// JWT claims. `sub` is the user ID; times are unix seconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Registration payload, already deserialized by the handler.
#[derive(Debug, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Stateless authentication service.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_hours: i64,
}

impl AuthService {
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        let secret = config.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expires_hours: config.jwt_expires_hours,
        }
    }

    /// Register a new account and issue a token for it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on validation failure, duplicate email, or a
    /// storage failure.
    pub async fn register(
        &self,
        store: &dyn Store,
        input: RegisterInput,
    ) -> Result<(User, String), AuthError> {
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;
        if input.name.trim().is_empty() {
            return Err(AuthError::WeakPassword(
                "Name must not be empty".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let user = store
            .create_user(NewUser {
                name: input.name.trim().to_string(),
                email,
                password_hash,
                phone: input.phone,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Store(other),
            })?;

        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for both unknown email and
    /// wrong password, so responses don't leak which one failed.
    pub async fn login(
        &self,
        store: &dyn Store,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let Some((user, hash)) = store.find_user_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&hash, password)? {
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    /// Change a user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password does
    /// not match, `AuthError::WeakPassword` if the new one fails policy.
    pub async fn change_password(
        &self,
        store: &dyn Store,
        user_id: UserId,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        validate_password(new)?;
        let hash = store.get_user_password_hash(user_id).await?;
        if !verify_password(&hash, current)? {
            return Err(AuthError::InvalidCredentials);
        }
        let new_hash = hash_password(new)?;
        store.update_password(user_id, &new_hash).await?;
        Ok(())
    }

    /// Sign a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Hashing` if signing fails (malformed key).
    pub fn issue_token(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.as_i32(),
            iat: now,
            exp: now + self.expires_hours * 3600,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::Hashing)
    }

    /// Validate a token's signature and expiry and return the subject.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any verification failure.
    pub fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(UserId::new(data.claims.sub))
    }
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Verify a password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if the stored hash cannot be parsed.
pub fn verify_password(hash: &str, password: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::Hashing)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Lowercase and trim an email, rejecting obviously malformed ones.
fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail);
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') {
        return Err(AuthError::InvalidEmail);
    }
    Ok(email)
}

/// Enforce the password policy.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password(&hash, "correct horse battery").unwrap());
        assert!(!verify_password(&hash, "wrong password").unwrap());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            normalize_email("  Jess@Example.COM ").unwrap(),
            "jess@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("user@nodot").is_err());
    }

    #[test]
    fn short_password_fails_policy() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }
}
