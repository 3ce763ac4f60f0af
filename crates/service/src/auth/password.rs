use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use tracing::warn;

use crate::errors::ServiceError;

/// One-way password hashing.
pub trait CredentialHasher: Send + Sync {
    /// Name stored alongside each hash.
    fn algorithm(&self) -> &'static str;
    fn hash(&self, password: &str) -> Result<String, ServiceError>;
    /// `false` for a wrong password and for a hash that cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with a random salt per hash.
#[derive(Clone, Default)]
pub struct Argon2Hashing {
    argon2: Argon2<'static>,
}

impl Argon2Hashing {
    /// Custom cost parameters, e.g. cheap ones for tests.
    pub fn with_params(params: Params) -> Self {
        Self { argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) }
    }
}

impl CredentialHasher for Argon2Hashing {
    fn algorithm(&self) -> &'static str { "argon2" }

    fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Unexpected(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self.argon2.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(e) => {
                warn!(error = %e, "stored password hash unreadable");
                false
            }
        }
    }
}

/// Minimum length, counted in characters.
pub fn check_password_policy(password: &str, min_length: usize) -> Result<(), ServiceError> {
    if password.chars().count() < min_length {
        return Err(ServiceError::Validation(format!("password too short (>={min_length})")));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> Argon2Hashing {
    Argon2Hashing::with_params(Params::new(1024, 1, 1, None).unwrap())
}
