// core/src/identity/password.rs

//! Argon2 password hashing for the email/password identity provider.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument};

use crate::error::ZibenError;

/// Hashes a plain-text password with a fresh random salt.
#[instrument(name = "identity::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, ZibenError> {
  if password.is_empty() {
    return Err(ZibenError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => Ok(hash.to_string()),
    Err(e) => {
      error!(error = %e, "Argon2 password hashing failed.");
      Err(ZibenError::Internal(format!("Password hashing failed: {}", e)))
    }
  }
}

/// Checks a password against a stored PHC hash string.
///
/// Returns `Ok(false)` on mismatch. A corrupt stored hash is an internal error, not a mismatch.
#[instrument(name = "identity::verify_password", skip(stored_hash, provided), err(Display))]
pub fn verify_password(stored_hash: &str, provided: &str) -> Result<bool, ZibenError> {
  if provided.is_empty() {
    return Ok(false);
  }

  let parsed = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Stored password hash could not be parsed.");
    ZibenError::Internal(format!("Invalid stored password hash: {}", e))
  })?;

  match Argon2::default().verify_password(provided.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password mismatch.");
      Ok(false)
    }
    Err(e) => Err(ZibenError::Internal(format!("Password verification failed: {}", e))),
  }
}
