use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use crate::domain::repository::PasswordHasher;
use crate::error::FleetServiceError;

/// Argon2id password digests with per-password random salts.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, FleetServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| FleetServiceError::Internal(anyhow::anyhow!("hash password: {e}")))?;
        Ok(digest.to_string())
    }

    fn verify(&self, digest: &str, password: &str) -> Result<bool, FleetServiceError> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            FleetServiceError::Internal(anyhow::anyhow!("parse password digest: {e}"))
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
