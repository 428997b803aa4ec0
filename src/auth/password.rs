//! Password hashing via bcrypt.

use thiserror::Error;
use tracing::error;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password length exceeds {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
    #[error("malformed password hash: {0}")]
    MalformedDigest(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Salted one-way hash. Rejects input bcrypt would silently truncate.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, PasswordError> {
    if plain.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        PasswordError::Hash(e.to_string())
    })
}

/// Returns `Ok(false)` on mismatch; errors only when `hash` is not a bcrypt digest.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt parse hash error");
        PasswordError::MalformedDigest(e.to_string())
    })
}
