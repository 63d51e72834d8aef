//! Admin authentication service.
//!
//! Passwords are hashed with Argon2id. Login failures for unknown usernames
//! and wrong passwords are indistinguishable to the caller.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use crate::models::User;
use crate::storage::{Storage, StorageError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username is already registered.
    #[error("username already taken")]
    UsernameTaken,

    /// Password does not meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Authentication service over the storage backend.
pub struct AuthService<'a> {
    storage: &'a dyn Storage,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .storage
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Create an admin user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short and
    /// `AuthError::UsernameTaken` if the username is already registered.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::WeakPassword("username cannot be empty".into()));
        }
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.storage
            .create_user(username, &password_hash)
            .await
            .map_err(|e| match e {
                StorageError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Storage(other),
            })
    }
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against an Argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_and_create_admin() {
        let storage = crate::storage::MemoryStorage::new();
        let auth = AuthService::new(&storage);

        let user = auth.create_admin("marie", "atelier-alto-2024").await.unwrap();
        assert_eq!(user.username, "marie");

        let logged_in = auth.login("marie", "atelier-alto-2024").await.unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            auth.login("marie", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "atelier-alto-2024").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.create_admin("marie", "another-password").await,
            Err(AuthError::UsernameTaken)
        ));
    }
}
