//! Password value object - hashing, verification and strength policy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Message returned when a new password fails the strength policy.
pub const PASSWORD_POLICY_MESSAGE: &str = "Password must be at least 8 characters long, contain at least 1 lowercase letter, contain at least 1 uppercase letter, and 1 number";

/// Hashed password. Immutable, compared by value.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a new plain text password after checking it against the strength policy.
    ///
    /// # Errors
    /// Returns a validation error on the `password` field if it is too weak.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        Self::check_strength(plain_text)?;
        Ok(Self {
            hash: Self::hash(plain_text)?,
        })
    }

    /// Wrap an existing hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// At least 8 characters with a lowercase letter, an uppercase letter and a digit.
    pub fn check_strength(plain_text: &str) -> AppResult<()> {
        let long_enough = plain_text.chars().count() >= MIN_PASSWORD_LENGTH;
        let has_lower = plain_text.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = plain_text.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = plain_text.chars().any(|c| c.is_ascii_digit());

        if long_enough && has_lower && has_upper && has_digit {
            Ok(())
        } else {
            Err(AppError::invalid_field("password", PASSWORD_POLICY_MESSAGE))
        }
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
